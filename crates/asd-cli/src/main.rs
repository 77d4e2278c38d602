//! Binario `asd`: lanza pipelines de bootstrap contra una red configurada.
//!
//! `asd list` muestra el catálogo; `asd run <tarea> --network <red>` arma el
//! engine, engancha Ctrl-C a la señal de cancelación y termina con un código
//! según el resultado (0 ok, 2 uso, 3 configuración, 4 algún Step falló).

mod logging;
mod networks;
mod registry_file;

use std::path::PathBuf;
use std::time::Duration;

use asd_core::{ConfigError, ExecutionConfig, InMemoryGateway, PipelineEngine, StepStatus};
use asd_tasks::catalog;

const EXIT_USAGE: i32 = 2;
const EXIT_CONFIG: i32 = 3;
const EXIT_STEP_FAILED: i32 = 4;

fn usage() -> ! {
    eprintln!("Uso: asd list");
    eprintln!("     asd run <tarea> --network <red> [--signer <ADDR>] [--confirmations <N>]");
    eprintln!("                     [--timeout-secs <N>] [--registry <PATH>] [--state <PATH>]");
    std::process::exit(EXIT_USAGE);
}

/// Un flag numérico mal formado es error de uso, nunca un default silencioso.
fn numeric_flag(flag: &str, value: Option<&str>) -> Result<u64, String> {
    match value {
        Some(raw) => raw.parse::<u64>()
                        .map_err(|_| format!("{flag}: '{raw}' no es un entero")),
        None => Err(format!("{flag} requiere un valor")),
    }
}

#[tokio::main]
async fn main() {
    // Cargar .env si existe para obtener ALCHEMY_KEY / DEPLOYER_ADDRESS
    let _ = dotenvy::dotenv();
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("list") => list(),
        Some("run") => run(&args[2..]).await,
        _ => usage(),
    }
}

fn list() {
    let full = match catalog::pipeline(catalog::ASD_SETUP) {
        Ok(def) => def,
        Err(e) => {
            eprintln!("[asd list] catálogo inválido: {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };
    println!("{} ({} Steps, plan {})", full.name(), full.len(), full.definition_hash());
    for step in full.steps() {
        let deps = step.depends_on();
        if deps.is_empty() {
            println!("  {}", step.id());
        } else {
            println!("  {}  <- {}", step.id(), deps.join(", "));
        }
    }
    println!();
    println!("Tareas individuales (cada una corre su clausura de dependencias):");
    for name in catalog::pipeline_names().into_iter().filter(|n| *n != catalog::ASD_SETUP) {
        println!("  {name}");
    }
}

async fn run(args: &[String]) {
    let mut pipeline: Option<String> = None;
    let mut network: Option<String> = None;
    let mut signer: Option<String> = None;
    let mut confirmations: Option<u64> = None;
    let mut timeout_secs: Option<u64> = None;
    let mut registry_path: Option<PathBuf> = None;
    let mut state_path: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--network" => {
                i += 1;
                if i < args.len() { network = Some(args[i].clone()); }
            }
            "--signer" => {
                i += 1;
                if i < args.len() { signer = Some(args[i].clone()); }
            }
            "--confirmations" => {
                i += 1;
                match numeric_flag("--confirmations", args.get(i).map(String::as_str)) {
                    Ok(n) => confirmations = Some(n),
                    Err(msg) => {
                        eprintln!("[asd run] {msg}");
                        std::process::exit(EXIT_USAGE);
                    }
                }
            }
            "--timeout-secs" => {
                i += 1;
                match numeric_flag("--timeout-secs", args.get(i).map(String::as_str)) {
                    Ok(n) => timeout_secs = Some(n),
                    Err(msg) => {
                        eprintln!("[asd run] {msg}");
                        std::process::exit(EXIT_USAGE);
                    }
                }
            }
            "--registry" => {
                i += 1;
                if i < args.len() { registry_path = Some(PathBuf::from(&args[i])); }
            }
            "--state" => {
                i += 1;
                if i < args.len() { state_path = Some(PathBuf::from(&args[i])); }
            }
            other if pipeline.is_none() && !other.starts_with("--") => {
                pipeline = Some(other.to_string());
            }
            _ => {}
        }
        i += 1;
    }

    let (Some(pipeline), Some(network)) = (pipeline, network) else { usage() };

    let definition = match catalog::pipeline(&pipeline) {
        Ok(def) => def,
        Err(e) => {
            eprintln!("[asd run] {e}");
            eprintln!("[asd run] tareas disponibles: {}", catalog::pipeline_names().join(", "));
            std::process::exit(EXIT_USAGE);
        }
    };

    let network_cfg = match networks::NETWORKS.resolve(&network) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[asd run] {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(fork) = &network_cfg.fork {
        tracing::info!(network = %network_cfg.name,
                       block = ?fork.block_number,
                       "red forkeada de {}", fork.url);
    }

    let signer = match signer.or_else(|| std::env::var("DEPLOYER_ADDRESS").ok()) {
        Some(s) => s,
        None => {
            eprintln!("[asd run] {}", ConfigError::MissingSigner);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let registry_path =
        registry_path.unwrap_or_else(|| PathBuf::from(format!("deployments/{network}.json")));
    let registry = match registry_file::load_registry(&registry_path) {
        Ok(reg) => reg,
        Err(e) => {
            eprintln!("[asd run] {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let gateway = InMemoryGateway::new();
    if let Some(path) = state_path {
        match registry_file::seed_gateway(&gateway, &path) {
            Ok(n) => tracing::info!(rows = n, "estado inicial sembrado desde {}", path.display()),
            Err(e) => {
                eprintln!("[asd run] {e}");
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let mut config = ExecutionConfig::new(network_cfg.name.clone(), signer);
    if let Some(n) = confirmations {
        config = config.with_confirmations(n);
    }
    if let Some(secs) = timeout_secs {
        config = config.with_tx_timeout(Duration::from_secs(secs));
    }

    let mut engine = PipelineEngine::new(gateway, registry, config);
    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("[asd run] interrupción: no se agendan más Steps");
            cancel.cancel();
        }
    });

    let report = engine.run(&definition).await;

    println!("corrida {} de '{}' en {} (plan {})",
             report.run_id, report.pipeline, report.network, report.plan_hash);
    for slot in report.steps.values() {
        let status = match slot.status {
            StepStatus::Pending => "pendiente",
            StepStatus::Running => "corriendo",
            StepStatus::Completed if slot.already_applied => "ok (ya aplicado)",
            StepStatus::Completed => "ok",
            StepStatus::Failed => "FALLO",
            StepStatus::Skipped => "salteado",
        };
        print!("  {:<24} {status}", slot.step_id);
        if slot.transactions > 0 {
            print!("  ({} tx)", slot.transactions);
        }
        if let Some(err) = &slot.error {
            print!("  {err}");
        }
        if let Some(reason) = &slot.skip_reason {
            print!("  {reason}");
        }
        println!();
    }
    if report.cancelled {
        println!("corrida cancelada por el operador");
    }

    if report.succeeded() && !report.cancelled {
        println!("{} transacciones enviadas", report.total_transactions());
    } else {
        std::process::exit(EXIT_STEP_FAILED);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_flag_parses_integers() {
        assert_eq!(numeric_flag("--confirmations", Some("3")), Ok(3));
    }

    #[test]
    fn malformed_or_missing_numeric_flag_is_an_error() {
        assert!(numeric_flag("--confirmations", Some("three")).is_err());
        assert!(numeric_flag("--timeout-secs", Some("")).is_err());
        assert!(numeric_flag("--timeout-secs", None).is_err());
    }
}
