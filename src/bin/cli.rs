use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use meritbook::cli::{fix_permissions, grant_permission, revoke_permission, seed_roles};
use meritbook_authz::PgRoleStore;
use meritbook_config::DatabaseConfig;

#[derive(Parser)]
#[command(name = "meritbook-cli")]
#[command(about = "Meritbook CLI - Administrative tools for Meritbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every role's stored permissions into the canonical array shape
    FixPermissions,
    /// Grant a permission to a role
    Grant {
        /// Role name, e.g. GIANG_VIEN
        #[arg(short, long)]
        role: String,
        /// Permission, e.g. activities.approve
        #[arg(short, long)]
        permission: String,
    },
    /// Revoke the literal permission from a role
    Revoke {
        /// Role name, e.g. GIANG_VIEN
        #[arg(short, long)]
        role: String,
        /// Permission, e.g. activities.approve
        #[arg(short, long)]
        permission: String,
    },
    /// Create the system roles with their default permission sets
    SeedRoles,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let db = DatabaseConfig::from_env();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(db.max_connections)
        .connect(&db.url)
        .await
        .expect("Failed to connect to database");
    let store = PgRoleStore::new(pool);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::FixPermissions => fix_permissions(&store).await.map(|summary| {
            println!(
                "✅ Scanned {} roles, rewrote {}",
                summary.scanned, summary.rewritten
            );
        }),
        Commands::Grant { role, permission } => {
            grant_permission(&store, &role, &permission)
                .await
                .map(|permissions| {
                    println!("✅ {role} now holds: {}", permissions.join(", "));
                })
        }
        Commands::Revoke { role, permission } => {
            revoke_permission(&store, &role, &permission)
                .await
                .map(|permissions| {
                    println!("✅ {role} now holds: {}", permissions.join(", "));
                })
        }
        Commands::SeedRoles => seed_roles(&store).await.map(|created| {
            if created.is_empty() {
                println!("✅ All system roles already exist");
            } else {
                println!("✅ Created roles: {}", created.join(", "));
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
