use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

mod code;
mod config;
mod form;
mod logging;
mod roles;

use code::{RandomSuffix, StaffCode};
use config::Config;
use form::{AutoCodeAssigner, Field, InputField, CODE_FIELD_ID, ROLE_FIELD_ID};
use roles::RoleTable;

#[derive(Parser)]
#[command(name = "staffcode", about = "Role-prefixed staff code generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Role table config file (JSON)
    #[arg(long, global = true, env = "STAFFCODE_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for reproducible codes
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate staff codes for a role
    Generate {
        /// Role name (e.g. Intern, Employee)
        role: String,

        /// Number of codes to print
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Simulate the role / staff code form fields
    Form {
        /// Role selected when the form loads
        #[arg(long, default_value = "")]
        role: String,

        /// Role changes to apply in order
        #[arg(long = "change")]
        changes: Vec<String>,

        /// Leave the role field off the form
        #[arg(long)]
        no_role_field: bool,

        /// Leave the staff code field off the form
        #[arg(long)]
        no_code_field: bool,
    },

    /// Parse a staff code and show which role it belongs to
    Inspect {
        /// Staff code (e.g. nxremp1234)
        code: String,
    },

    /// List configured roles and prefixes
    Roles,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let table = Config::resolve(cli.config.as_deref())?.into_table();
    let source = RandomSuffix(make_rng(cli.seed));

    match cli.command {
        Command::Generate { role, count } => cmd_generate(&table, source, &role, count, cli.json),
        Command::Form {
            role,
            changes,
            no_role_field,
            no_code_field,
        } => {
            let role_field = (!no_role_field).then(|| InputField::new(ROLE_FIELD_ID, role));
            let code_field = (!no_code_field).then(|| InputField::new(CODE_FIELD_ID, ""));
            cmd_form(table, source, role_field, code_field, &changes, cli.json)
        }
        Command::Inspect { code } => cmd_inspect(&table, &code, cli.json),
        Command::Roles => cmd_roles(&table, cli.json),
    }
}

fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(s) => Box::new(ChaCha8Rng::seed_from_u64(s)),
        None => Box::new(rand::thread_rng()),
    }
}

// --- Command implementations ---

fn cmd_generate(
    table: &RoleTable,
    mut source: RandomSuffix<Box<dyn RngCore>>,
    role: &str,
    count: usize,
    json: bool,
) -> Result<()> {
    if !table.is_recognized(role) {
        let known: Vec<&str> = table.iter().map(|(r, _)| r).collect();
        bail!("unrecognized role '{role}' (known: {})", known.join(", "));
    }
    let codes: Vec<String> = (0..count)
        .map(|_| table.generate(role, &mut source))
        .collect();

    if json {
        println!("{}", serde_json::to_string(&codes)?);
    } else {
        for c in &codes {
            println!("{c}");
        }
    }
    Ok(())
}

fn cmd_form(
    table: RoleTable,
    source: RandomSuffix<Box<dyn RngCore>>,
    role_field: Option<InputField>,
    code_field: Option<InputField>,
    changes: &[String],
    json: bool,
) -> Result<()> {
    let Some(mut assigner) = AutoCodeAssigner::initialize(role_field, code_field, table, source)
    else {
        if json {
            println!(r#"{{"attached":false}}"#);
        } else {
            println!("not attached");
        }
        return Ok(());
    };

    #[derive(serde::Serialize)]
    struct Step {
        event: &'static str,
        role: String,
        staff_code: String,
    }

    let snapshot = |a: &AutoCodeAssigner<InputField, _>, event| Step {
        event,
        role: a.role_field().value().to_string(),
        staff_code: a.code_field().value().to_string(),
    };

    let mut steps = vec![snapshot(&assigner, "load")];
    for change in changes {
        assigner.select_role(change.as_str());
        steps.push(snapshot(&assigner, "change"));
    }

    if json {
        #[derive(serde::Serialize)]
        struct Out {
            attached: bool,
            steps: Vec<Step>,
        }
        let out = Out {
            attached: true,
            steps,
        };
        println!("{}", serde_json::to_string(&out)?);
    } else {
        for s in &steps {
            let role = if s.role.is_empty() { "-" } else { &s.role };
            let code = if s.staff_code.is_empty() {
                "(empty)"
            } else {
                &s.staff_code
            };
            println!("{:<7} {:<12} {}", s.event, role, code);
        }
    }
    Ok(())
}

fn cmd_inspect(table: &RoleTable, raw: &str, json: bool) -> Result<()> {
    let code: StaffCode = raw.parse()?;
    let role = table.role_for_prefix(&code.prefix);

    if json {
        #[derive(serde::Serialize)]
        struct Out<'a> {
            #[serde(flatten)]
            code: &'a StaffCode,
            role: Option<&'a str>,
        }
        println!("{}", serde_json::to_string(&Out { code: &code, role })?);
    } else {
        println!(
            "{}  prefix {}  number {}  role {}",
            code,
            code.prefix,
            code.number,
            role.unwrap_or("unknown")
        );
    }
    Ok(())
}

fn cmd_roles(table: &RoleTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(table)?);
    } else {
        for (role, prefix) in table.iter() {
            println!("{:<12} {prefix}", role);
        }
        println!("{:<12} {}", "(fallback)", table.fallback());
    }
    Ok(())
}
