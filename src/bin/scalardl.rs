//! Command-line front end for the Scalar DL client
//!
//! Usage:
//!   scalardl --properties client.properties register-cert
//!   scalardl --properties client.properties execute-contract \
//!       --contract-id c1 --contract-argument '{"asset_id":"a"}'

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use scalardl_client::client::NONCE_KEY;
use scalardl_client::domain::{parse_object, JsonObject, Proof};
use scalardl_client::telemetry::{init_tracing, TelemetryConfig};
use scalardl_client::{ClientConfig, ClientError, ClientService, LedgerValidationArgs};

#[derive(Parser)]
#[command(name = "scalardl")]
#[command(about = "Scalar DL client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Client configuration in Java-properties format
    #[arg(long, conflicts_with = "json_config")]
    properties: Option<PathBuf>,

    /// Client configuration in JSON format
    #[arg(long)]
    json_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the configured certificate
    RegisterCert,
    /// Register a contract
    RegisterContract {
        #[arg(long)]
        contract_id: String,

        /// Binary name of the contract, e.g. com.example.MyContract
        #[arg(long)]
        contract_binary_name: String,

        /// Path to the compiled contract
        #[arg(long)]
        contract_class_file: PathBuf,

        /// Contract properties as a JSON object
        #[arg(long)]
        contract_properties: Option<String>,
    },
    /// List registered contracts
    ListContracts {
        #[arg(long)]
        contract_id: Option<String>,
    },
    /// Execute a registered contract
    ExecuteContract {
        #[arg(long)]
        contract_id: String,

        /// Contract argument as a JSON object
        #[arg(long)]
        contract_argument: String,

        /// Function argument as a JSON object
        #[arg(long)]
        function_argument: Option<String>,
    },
    /// Validate the history of an asset
    ValidateLedger {
        #[arg(long)]
        asset_id: String,

        #[arg(long)]
        start_age: Option<i64>,

        #[arg(long)]
        end_age: Option<i64>,
    },
    /// Validate the whole history of an asset on Ledger alone
    ValidateLedgers {
        #[arg(long)]
        asset_id: String,
    },
    /// Retrieve the proof of an asset
    RetrieveProof {
        #[arg(long)]
        asset_id: String,

        /// Age to retrieve; the latest when omitted
        #[arg(long)]
        age: Option<i32>,
    },
    /// Abort an execution identified by its nonce
    AbortExecution {
        #[arg(long)]
        nonce: String,
    },
}

fn load_config(args: &ConfigArgs) -> anyhow::Result<ClientConfig> {
    let (path, is_json) = match (&args.properties, &args.json_config) {
        (Some(path), _) => (path, false),
        (None, Some(path)) => (path, true),
        (None, None) => bail!("either --properties or --json-config is required"),
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let config = if is_json {
        ClientConfig::from_json(&text)?
    } else {
        ClientConfig::from_properties(&text)?
    };
    Ok(config)
}

fn json_object(text: &str, what: &str) -> anyhow::Result<JsonObject> {
    parse_object(text).with_context(|| format!("{} must be a JSON object", what))
}

fn read_bytecode(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_proof(label: &str, proof: Option<&Proof>) {
    match proof {
        Some(proof) => println!("{}: {}", label, proof),
        None => println!("{}: none", label),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.config)?;
    let service = ClientService::new(config)?;

    match cli.command {
        Commands::RegisterCert => {
            service.register_certificate().await?;
            println!("certificate registered");
        }
        Commands::RegisterContract {
            contract_id,
            contract_binary_name,
            contract_class_file,
            contract_properties,
        } => {
            let bytecode = read_bytecode(&contract_class_file)?;
            let properties = contract_properties
                .as_deref()
                .map(|text| json_object(text, "contract properties"))
                .transpose()?;
            service
                .register_contract(
                    &contract_id,
                    &contract_binary_name,
                    &bytecode,
                    properties.as_ref(),
                )
                .await?;
            println!("contract {} registered", contract_id);
        }
        Commands::ListContracts { contract_id } => {
            let listing = service.list_contracts(contract_id.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&listing.contracts)?);
        }
        Commands::ExecuteContract {
            contract_id,
            contract_argument,
            function_argument,
        } => {
            let mut argument = json_object(&contract_argument, "contract argument")?;
            let function_argument = function_argument
                .as_deref()
                .map(|text| json_object(text, "function argument"))
                .transpose()?;

            let executed = service
                .execute_contract(&contract_id, &mut argument, function_argument.as_ref())
                .await
                .map_err(|e| {
                    if let Some(nonce) = argument.get(NONCE_KEY).and_then(|v| v.as_str()) {
                        eprintln!("nonce: {}", nonce);
                    }
                    e
                })?;

            if let Some(result) = &executed.result {
                println!("result: {}", serde_json::to_string(result)?);
            }
            for proof in &executed.proofs {
                print_proof("proof", Some(proof));
            }
            for proof in &executed.auditor_proofs {
                print_proof("auditor proof", Some(proof));
            }
        }
        Commands::ValidateLedger {
            asset_id,
            start_age,
            end_age,
        } => {
            let args = LedgerValidationArgs {
                asset_id,
                start_age,
                end_age,
            };
            let validated = service.validate_ledger(args).await?;

            println!("status: {}", validated.code);
            print_proof("proof", validated.proof.as_ref());
            if service.config().auditor_enabled {
                print_proof("auditor proof", validated.auditor_proof.as_ref());
            }
            if !validated.code.is_ok() {
                return Err(ClientError::status(validated.code, "ledger validation failed").into());
            }
        }
        Commands::ValidateLedgers { asset_id } => {
            let validated = service.validate_ledgers(&asset_id).await?;

            println!("status: {}", validated.code);
            print_proof("proof", validated.proof.as_ref());
            if !validated.code.is_ok() {
                return Err(ClientError::status(validated.code, "ledger validation failed").into());
            }
        }
        Commands::RetrieveProof { asset_id, age } => {
            let record = service.retrieve_asset_proof(&asset_id, age).await?;
            println!("ledger: {}", record.ledger_name);
            print_proof("proof", record.proof.as_ref());
        }
        Commands::AbortExecution { nonce } => {
            let state = service.abort_execution(&nonce).await?;
            println!("state: {:?}", state);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&TelemetryConfig::from_env()) {
        eprintln!("failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ClientError>() {
                Some(ClientError::Status { code, message }) => eprintln!("{} {}", code, message),
                Some(client_error) => eprintln!("{} {}", client_error.status_code(), client_error),
                None => eprintln!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
