//! Classification predicates. Both are pure and never fail.

use crate::source::{AttributeDecl, ParamDecl};

/// Derive that marks a struct as a message.
pub const MESSAGE_DERIVE: &str = "Message";
/// Derive that marks a struct as a component.
pub const COMPONENT_DERIVE: &str = "Component";

/// Substrings of a parameter type that mark a function as a system.
///
/// Matching is on raw type text, so `MyResourceHandle` matches `Res`. That
/// is accepted: there is no type resolution to do better with.
pub const SYSTEM_PARAM_MARKERS: [&str; 6] = [
    "Query",
    "Commands",
    "Res",
    "ResMut",
    "EventWriter",
    "EventReader",
];

/// Whether any `derive(...)` in `attributes` names `trait_name`.
///
/// A qualified path matches on its last segment, so
/// `bevy::prelude::Component` derives `Component`. Names are compared
/// whole: `MessageExtra` does not derive `Message`.
pub fn has_derived_trait(attributes: &[AttributeDecl], trait_name: &str) -> bool {
    attributes.iter().any(|attr| match attr {
        AttributeDecl::Derive(paths) => paths
            .iter()
            .any(|path| last_segment(path) == trait_name),
        AttributeDecl::Other(_) => false,
    })
}

/// Whether a function with these value parameters looks like an ECS system.
pub fn is_system(params: &[ParamDecl]) -> bool {
    params.iter().any(|param| {
        let ty = param.ty.as_deref().unwrap_or("");
        SYSTEM_PARAM_MARKERS.iter().any(|marker| ty.contains(marker))
    })
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path).trim()
}
