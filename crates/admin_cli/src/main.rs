use std::{error::Error, io::BufRead};

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError, NewUser, Role};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "vending_admin")]
#[command(about = "Admin utilities for the vending machine (bootstrap users, inspect stock)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./vending.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Product(Product),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// `buyer` or `seller`.
    #[arg(long, default_value = "buyer", value_parser = parse_role)]
    role: Role,
    /// Read the password from stdin, e.g. `echo "$PW" | vending_admin ...`.
    #[arg(long)]
    password_stdin: bool,
}

#[derive(Args, Debug)]
struct Product {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    List,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|_| format!("unsupported role: {raw}"))
}

/// Read the password from the first line of stdin.
///
/// Only the trailing line break is stripped, so the password is stored
/// exactly as typed.
fn read_password(mut input: impl BufRead) -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.strip_suffix('\n').unwrap_or(&line);
    let password = password.strip_suffix('\r').unwrap_or(password);
    if password.is_empty() {
        return Err("password must not be empty".into());
    }
    Ok(password.to_string())
}

fn password_for(
    args: &UserCreateArgs,
    input: impl BufRead,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    if !args.password_stdin {
        return Err("pass the password on stdin together with --password-stdin".into());
    }
    read_password(input)
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = password_for(&args, std::io::stdin().lock())?;

            let user = match engine
                .register(NewUser {
                    username: args.username.clone(),
                    password,
                    role: Some(args.role),
                })
                .await
            {
                Ok(user) => user,
                Err(EngineError::Conflict(_)) => {
                    eprintln!("user already exists: {}", args.username);
                    std::process::exit(1);
                }
                Err(EngineError::InvalidInput(reason)) => {
                    eprintln!("{reason}");
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            };

            println!("created user: {} ({}, id {})", user.username, user.role, user.id);
        }
        Command::Product(Product {
            command: ProductCommand::List,
        }) => {
            let products = engine.products().await?;
            if products.is_empty() {
                println!("no products");
            }
            for product in products {
                println!(
                    "{:>5}  {:<30} cost {:>6}  stock {:>6}  seller {}",
                    product.id,
                    product.product_name,
                    product.cost,
                    product.amount_available,
                    product.seller_id
                );
            }
        }
    }

    Ok(())
}
