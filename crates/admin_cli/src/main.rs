use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "pocketpal_admin")]
#[command(about = "Admin utilities for PocketPal (users and API tokens)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./pocketpal.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Token(Token),
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
    user_id: String,
    /// Also issue a token for the new user.
    #[arg(long)]
    with_token: bool,
}

#[derive(Args, Debug)]
struct Token {
    #[command(subcommand)]
    command: TokenCommand,
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    Issue(TokenIssueArgs),
    Revoke(TokenRevokeArgs),
}

#[derive(Args, Debug)]
struct TokenIssueArgs {
    #[arg(long)]
    user_id: String,
}

#[derive(Args, Debug)]
struct TokenRevokeArgs {
    /// The plain token, as printed by `token issue`.
    #[arg(long, env = "POCKETPAL_TOKEN")]
    token: String,
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
            let user_id = match engine.create_user(&args.user_id).await {
                Ok(user_id) => user_id,
                Err(EngineError::Conflict(_)) => {
                    eprintln!("user already exists: {}", args.user_id.trim());
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            println!("created user: {user_id}");
            if args.with_token {
                let token = engine.issue_token(&user_id).await?;
                println!("token: {token}");
            }
        }
        Command::Token(Token {
            command: TokenCommand::Issue(args),
        }) => {
            let token = engine.issue_token(&args.user_id).await?;
            println!("{token}");
            eprintln!("store this token now: it cannot be shown again");
        }
        Command::Token(Token {
            command: TokenCommand::Revoke(args),
        }) => {
            engine.revoke_token(&args.token).await?;
            println!("token revoked");
        }
    }

    Ok(())
}
