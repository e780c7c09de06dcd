use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::Input;
use dotenvy::dotenv;
use edugate_auth::{Role, create_access_token};
use edugate_cli::seeder::{self, CatalogShape, SeedConfig};
use edugate_config::JwtConfig;
use edugate_db::{PgPool, init_db_pool};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "edugate-cli")]
#[command(about = "Edugate CLI - Administrative tools for edugate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Student,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Student => Role::Student,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Register a student (prompts for missing fields)
    CreateStudent {
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        #[arg(short = 'p', long)]
        phone: Option<String>,
    },
    /// Print a signed access token
    IssueToken {
        #[arg(short = 'r', long, value_enum)]
        role: RoleArg,

        /// Subject id; a random id is used when omitted
        #[arg(short = 's', long)]
        subject: Option<Uuid>,
    },
    /// Seed materials with content, students and codes groups
    Seed {
        #[arg(short = 'm', long, default_value = "3")]
        materials: usize,

        #[arg(long, default_value = "4")]
        sections: usize,

        /// Videos per section
        #[arg(long, default_value = "6")]
        videos: usize,

        /// Question groups per section
        #[arg(long, default_value = "10")]
        question_groups: usize,

        /// Files per material
        #[arg(long, default_value = "3")]
        files: usize,

        #[arg(long, default_value = "50")]
        students: usize,

        /// Codes per material
        #[arg(long, default_value = "20")]
        codes: usize,

        /// Days until the seeded codes expire
        #[arg(long, default_value = "30")]
        validity_days: i64,
    },
    /// Seed only students
    SeedStudents {
        #[arg(long, default_value = "50")]
        students: usize,
    },
    /// Clear all seeded data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::CreateStudent {
            first_name,
            last_name,
            phone,
        } => handle_create_student(first_name, last_name, phone).await,
        Commands::IssueToken { role, subject } => handle_issue_token(role.into(), subject),
        Commands::Seed {
            materials,
            sections,
            videos,
            question_groups,
            files,
            students,
            codes,
            validity_days,
        } => {
            let config = SeedConfig::new(materials)
                .with_catalog(CatalogShape {
                    sections_per_material: sections,
                    videos_per_section: videos,
                    question_groups_per_section: question_groups,
                    files_per_material: files,
                })
                .with_students(students)
                .with_codes(codes, validity_days);
            seeder::seed_all(&connect().await?, config).await
        }
        Commands::SeedStudents { students } => {
            let inserted = seeder::students::seed_students(&connect().await?, students).await?;
            println!("✅ Created {} students", inserted);
            Ok(())
        }
        Commands::ClearSeed => seeder::clear_all(&connect().await?).await,
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    init_db_pool().await
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {}", prompt.to_lowercase())),
    }
}

async fn handle_create_student(
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
) -> anyhow::Result<()> {
    let first_name = prompt_if_missing(first_name, "First name")?;
    let last_name = prompt_if_missing(last_name, "Last name")?;
    let phone = prompt_if_missing(phone, "Phone")?;

    let pool = connect().await?;
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO students (first_name, last_name, phone)
           VALUES ($1, $2, $3)
           ON CONFLICT (phone) DO NOTHING
           RETURNING id"#,
    )
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(phone.trim())
    .fetch_optional(&pool)
    .await?
    .context("A student with this phone already exists")?;

    println!("\n✅ Student created successfully!");
    println!("   ID: {}", id);
    println!("   Name: {} {}", first_name.trim(), last_name.trim());
    Ok(())
}

fn handle_issue_token(role: Role, subject: Option<Uuid>) -> anyhow::Result<()> {
    let subject = subject.unwrap_or_else(Uuid::new_v4);
    let config = JwtConfig::from_env();
    let token = create_access_token(subject, role, &config)
        .map_err(|e| e.error)
        .context("Failed to sign token")?;

    eprintln!("Role: {}, subject: {}", role, subject);
    println!("{}", token);
    Ok(())
}
