use std::{env, fs, process::ExitCode};

use iniconf_lexer::Scanner;
use iniconf_rs::de::from_str;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Config {
    mysql: MysqlConfig,
    server: ServerConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MysqlConfig {
    host: String,
    username: String,
    password: String,
    port: i64,
    timeout: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ServerConfig {
    ip: String,
    port: u16,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| "config.ini".to_owned());
    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    for line in Scanner::new(&source) {
        match line {
            Ok(line) => println!("<line>: {line:?}"),
            Err(err) => println!("<error>: {err}"),
        }
    }

    match from_str::<Config>(&source) {
        Ok(config) => {
            println!("{config:#?}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.report(&source));
            ExitCode::FAILURE
        }
    }
}
