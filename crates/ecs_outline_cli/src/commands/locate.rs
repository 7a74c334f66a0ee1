use ecs_outline_cli::render::location;
use ecs_outline_cli::{locate, run_outline, OutlineInput};

use crate::LocateArgs;

pub fn run_locate(args: LocateArgs) -> Result<(), String> {
    let output = run_outline(OutlineInput {
        root: args.path,
        kinds: None,
        show_fields: None,
        exclude_dirs: Vec::new(),
    })?;

    let matches = locate(&output.report.result, &args.name);
    if matches.is_empty() {
        return Err(format!("no message, component or system named '{}'", args.name));
    }

    if args.json {
        let json = serde_json::to_string(&matches).map_err(|err| format!("json encode: {}", err))?;
        println!("{}", json);
        return Ok(());
    }

    for item in matches {
        let loc = location(item, Some(&output.root)).unwrap_or_else(|| "-".to_string());
        match item.text_offset {
            Some(offset) => println!("{} {} offset={}", item.kind, loc, offset),
            None => println!("{} {}", item.kind, loc),
        }
    }
    Ok(())
}
