//! dbc CLI - Design-by-Contract Validation
//!
//! Lists the validator catalogue and checks JSON documents against specs.

use anyhow::{anyhow, bail, Context, Result};
use dbc::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("dbc");

    if args.len() < 2 {
        print_usage(program);
        return Ok(());
    }

    let options = Options::parse(&args[2..])?;

    match args[1].as_str() {
        "list" => list_validators(),
        "info" => {
            let Some(name) = options.positional.first() else {
                bail!("please specify a validator name");
            };
            validator_info(name)
        }
        "check" => {
            if options.positional.len() < 2 {
                eprintln!(
                    "Usage: {} check <spec> <target.json> [--context <msg>] [--config <file>]",
                    program
                );
                bail!("please specify a spec and a target");
            }
            check_target(&options)
        }
        "validate" => {
            if options.positional.len() < 2 {
                eprintln!("Usage: {} validate <spec> <glob>... [--config <file>]", program);
                bail!("please specify a spec and at least one target pattern");
            }
            validate_targets(&options)
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(program);
            Ok(())
        }
    }
}

fn print_usage(program: &str) {
    println!("dbc - Design-by-Contract Validation v{}", dbc::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                        List all available validators");
    println!("  info <validator>            Show details about a validator");
    println!("  check <spec> <target>       Stop at the first violation");
    println!("  validate <spec> <glob>...   Report every violation in every matching file");
    println!("  help                        Show this help message");
    println!();
    println!("<spec> is a JSON spec file, or @Name for a type defined in the config.");
    println!();
    println!("Options:");
    println!("  --config <file>     TOML configuration (engine options, contract types)");
    println!("  --context <msg>     Prefix for the violation reported by check");
}

/// Parsed command-line options after the command name.
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    config: Option<PathBuf>,
    context: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    let path = args.get(i + 1).ok_or_else(|| anyhow!("--config needs a file"))?;
                    options.config = Some(PathBuf::from(path));
                    i += 2;
                }
                "--context" => {
                    let context =
                        args.get(i + 1).ok_or_else(|| anyhow!("--context needs a message"))?;
                    options.context = Some(context.clone());
                    i += 2;
                }
                flag if flag.starts_with("--") => bail!("unknown option: {}", flag),
                value => {
                    options.positional.push(value.to_string());
                    i += 1;
                }
            }
        }

        Ok(options)
    }

    fn engine(&self) -> Result<ContractEngine> {
        match &self.config {
            Some(path) => {
                let config = ContractConfig::load(path)?;
                log::info!("{} contract type(s) from {}", config.types.len(), path.display());
                Ok(config.build_engine())
            }
            None => Ok(ContractEngine::new()),
        }
    }
}

fn list_validators() -> Result<()> {
    let registry = ValidatorRegistry::with_builtins();

    println!("Available validators ({} total):", registry.len());
    println!();
    for entry in registry.entries() {
        println!("  • {:<22} {}", entry.name, entry.description);
    }
    Ok(())
}

fn validator_info(name: &str) -> Result<()> {
    let registry = ValidatorRegistry::with_builtins();

    match registry.get_entry(name) {
        Some(entry) => {
            println!("Validator: {}", entry.name);
            println!("Kind: {}", if entry.is_builtin() { "built-in" } else { "extension" });
            println!();
            println!("Description:");
            println!("  {}", entry.description);
            Ok(())
        }
        None => {
            let similar = registry.search(name);
            if !similar.is_empty() {
                eprintln!("Did you mean: {}?", similar.join(", "));
            }
            eprintln!("Use 'list' to see available validators.");
            bail!("validator not found: {}", name)
        }
    }
}

fn load_spec(engine: &ContractEngine, source: &str) -> Result<Arc<ValidationSpec>> {
    if let Some(name) = source.strip_prefix('@') {
        return engine
            .contract_type(name)
            .ok_or_else(|| {
                anyhow!(
                    "contract type '{}' is not defined (known: {:?})",
                    name,
                    engine.type_names()
                )
            });
    }

    let text = std::fs::read_to_string(source).with_context(|| format!("reading spec {}", source))?;
    let spec =
        ValidationSpec::from_json(&text).with_context(|| format!("parsing spec {}", source))?;
    Ok(Arc::new(spec))
}

fn load_target(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading target {}", path.display()))?;
    let json: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing target {}", path.display()))?;
    Ok(Value::from(json))
}

fn check_target(options: &Options) -> Result<()> {
    let engine = options.engine()?;
    let spec = load_spec(&engine, &options.positional[0])?;
    let path = Path::new(&options.positional[1]);
    let target = load_target(path)?;

    match engine.check(&target, &spec, options.context.as_deref()) {
        Ok(()) => {
            println!("✅ {} is valid", path.display());
            Ok(())
        }
        Err(ContractError::Violation(message)) => {
            eprintln!("❌ {}: {}", path.display(), message);
            std::process::exit(1);
        }
        Err(error) => Err(error.into()),
    }
}

fn validate_targets(options: &Options) -> Result<()> {
    let engine = options.engine()?;
    let spec = load_spec(&engine, &options.positional[0])?;

    let mut paths = Vec::new();
    for pattern in &options.positional[1..] {
        for entry in glob::glob(pattern).with_context(|| format!("bad pattern {}", pattern))? {
            paths.push(entry?);
        }
    }
    if paths.is_empty() {
        bail!("no files matched");
    }

    let targets = paths.iter().map(|path| load_target(path)).collect::<Result<Vec<_>>>()?;
    log::debug!("validating {} target(s)", targets.len());

    let mut invalid = 0;
    for (path, result) in paths.iter().zip(engine.validate_all(&targets, &spec)) {
        let failures = result.with_context(|| format!("validating {}", path.display()))?;
        if failures.is_empty() {
            println!("✅ {}", path.display());
        } else {
            invalid += 1;
            println!("❌ {}", path.display());
            for failure in failures {
                println!("   {}", failure);
            }
        }
    }

    println!();
    println!("{} of {} file(s) valid", paths.len() - invalid, paths.len());
    if invalid > 0 {
        std::process::exit(1);
    }
    Ok(())
}
