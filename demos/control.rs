use std::env;

use daikin_ir::{AccessoryConfig, AcMode, CommandLogMode};

fn usage() -> ! {
    eprintln!("usage: control <config.json> <on|off|mode <auto|cool|heat|dry|fan>|temp <value>|swing <on|off>|boost <on|off>> [--log <path>]");
    std::process::exit(2);
}

fn flag(value: Option<&String>) -> bool {
    match value.map(String::as_str) {
        Some("on") => true,
        Some("off") => false,
        _ => usage(),
    }
}

#[tokio::main]
async fn main() -> daikin_ir::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).unwrap_or_else(|| usage());
    let config = AccessoryConfig::from_path(config_path)?;

    let mut builder = config.controller_builder().on_event(|event| {
        println!("{event:?}");
    });
    if let Some(path) = args
        .iter()
        .position(|a| a == "--log")
        .and_then(|i| args.get(i + 1))
    {
        builder = builder.command_log(CommandLogMode::Full, path);
    }
    let accessory = config.accessory(builder)?;
    let ctl = accessory.controller();

    println!("{} ({:?})", accessory.label(), accessory.profile());

    let outcome = match args.get(2).map(String::as_str) {
        Some("on") => ctl.set_power(true).await?,
        Some("off") => ctl.set_power(false).await?,
        Some("mode") => {
            let mode = args
                .get(3)
                .and_then(|m| serde_json::from_value::<AcMode>(m.as_str().into()).ok())
                .unwrap_or_else(|| usage());
            ctl.set_mode_with_power(mode, true).await?
        }
        Some("temp") => {
            let value: f64 = args
                .get(3)
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| usage());
            ctl.set_target_temperature(value).await?
        }
        Some("swing") => ctl.set_swing(flag(args.get(3))).await?,
        Some("boost") => ctl.set_boost(flag(args.get(3))).await?,
        _ => usage(),
    };

    println!("{outcome:?}: {:?}", ctl.state());
    Ok(())
}
