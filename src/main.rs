use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use clap::Parser;

use springloom::cli::{self, Args};
use springloom::plugins::headless::HeadlessPlugin;
use springloom::{CameraPlugin, SimulationPlugin};

fn log_plugin(verbose: bool) -> LogPlugin {
    LogPlugin {
        level: if verbose { Level::DEBUG } else { Level::INFO },
        filter: "wgpu=error,naga=warn".to_string(),
        ..default()
    }
}

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_integrators {
        cli::handle_list_integrators();
        return AppExit::Success;
    }

    let mut app = App::new();
    if args.headless {
        app.add_plugins((MinimalPlugins, log_plugin(args.verbose)));
    } else {
        app.add_plugins(
            DefaultPlugins
                .set(log_plugin(args.verbose))
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Springloom".to_string(),
                        ..default()
                    }),
                    ..default()
                }),
        );
    }

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return AppExit::error();
        }
    };

    if args.headless {
        match HeadlessPlugin::from_config(&config, args.frames, args.frame_dt) {
            Ok(plugin) => app.add_plugins(plugin),
            Err(e) => {
                error!("{e}");
                return AppExit::error();
            }
        };
    } else {
        match SimulationPlugin::from_config(config) {
            Ok(plugin) => app.add_plugins((plugin, CameraPlugin)),
            Err(e) => {
                error!("{e}");
                return AppExit::error();
            }
        };
    }

    app.run()
}
