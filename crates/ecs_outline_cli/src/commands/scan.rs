use ecs_outline_cli::render::filter_kinds;
use ecs_outline_cli::{render_diagnostics, render_outline, run_outline, OutlineInput};

use crate::ScanArgs;

pub fn run_scan(args: ScanArgs) -> Result<(), String> {
    let output = run_outline(OutlineInput {
        root: args.path,
        kinds: Some(args.kind.into_iter().map(Into::into).collect()),
        show_fields: args.no_fields.then_some(false),
        exclude_dirs: args.exclude,
    })?;

    if !output.report.diagnostics.skipped.is_empty() && !args.show_skipped {
        log::warn!(
            "{} file(s) skipped; rerun with --show-skipped for details",
            output.report.diagnostics.skipped_count()
        );
    }

    if args.json {
        let result = filter_kinds(&output.report.result, &output.render.kinds);
        let json = serde_json::to_string(&serde_json::json!({
            "root": output.root,
            "config": output.config.source,
            "result": result,
            "diagnostics": &output.report.diagnostics,
        }))
        .map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
        return Ok(());
    }

    print!(
        "{}",
        render_outline(&output.report.result, Some(&output.root), &output.render)
    );
    if args.show_skipped {
        print!("{}", render_diagnostics(&output.report.diagnostics));
    }
    Ok(())
}
