mod cli;
mod error_fmt;
mod rt;
mod run;

use clap::Parser;
use eyre::WrapErr;
use std::fs;

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use turngate_core::conversions::model_from_config;
use turngate_core::model::PredictionModel;
use turngate_core::predictor::ReleasePredictor;

fn main() {
    let code = match try_main() {
        Ok(()) => 0,
        Err(err) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                error_fmt::print_json_error(&err);
            } else {
                eprintln!("{}", error_fmt::humanize(&err));
            }
            error_fmt::exit_code_for_error(&err)
        }
    };
    std::process::exit(code);
}

fn try_main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);

    let text = fs::read_to_string(&args.config)
        .wrap_err_with(|| format!("read config {:?}", args.config))?;
    let cfg = turngate_config::load_toml(&text)
        .map_err(|e| eyre::eyre!("parse config {:?}: {}", args.config, e))?;
    cfg.validate().wrap_err("invalid configuration")?;

    init_tracing(&args, &cfg.logging)?;

    // Model precedence: CSV override > inline TOML model > reference.
    let model = if let Some(path) = &args.model {
        let segments = turngate_config::load_model_csv(path)?;
        model_from_config(&turngate_config::ModelCfg { segments })?
    } else if let Some(mcfg) = &cfg.model {
        model_from_config(mcfg)?
    } else {
        PredictionModel::reference()
    };

    match args.cmd {
        Commands::Run {
            ticks,
            sim_period_us,
            rt,
            rt_prio,
        } => {
            let stats = run::run_rig(&cfg, model, ticks, sim_period_us, rt, rt_prio)?;
            if args.json {
                let obj = serde_json::json!({
                    "ok": true,
                    "ticks": stats.ticks,
                    "releases": stats.releases,
                });
                println!("{obj}");
            } else {
                println!("done: {} ticks, {} releases", stats.ticks, stats.releases);
            }
        }

        Commands::CheckConfig => {
            // Config and model were already validated above.
            if args.json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("config ok: {:?}", args.config);
            }
        }

        Commands::Predict {
            last_turn_us,
            time_in_round_us,
        } => {
            let predictor = ReleasePredictor::new(model, (&cfg.release).into());
            match predictor.time_to_release(last_turn_us, time_in_round_us) {
                Ok(wait_us) => {
                    if args.json {
                        println!(
                            "{}",
                            serde_json::json!({ "ok": true, "wait_us": wait_us })
                        );
                    } else {
                        println!("wait_us: {wait_us}");
                    }
                }
                Err(e) => {
                    return Err(eyre::Report::new(e).wrap_err("prediction unavailable"));
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(args: &Cli, logging: &turngate_config::Logging) -> eyre::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));

    let console = if args.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    let mut layers: Vec<Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>> =
        vec![console];

    if let Some(path) = logging.file.as_deref() {
        let path = std::path::Path::new(path);
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => std::path::Path::new("."),
        };
        let name = path.file_name().unwrap_or_else(|| "turngate.log".as_ref());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (nb, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(fmt::layer().json().with_ansi(false).with_writer(nb).boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))?;
    Ok(())
}
