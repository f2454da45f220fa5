use std::io::{self, BufRead, Write};

use aitutor::api::{
    CourseFilters, Credentials, NewChatSession, Role, TokenStore, TutorClient,
};
use aitutor::config::Session;
use aitutor::store::{AuthStore, CoursesStore, DashboardStore, TutorStore};
use aitutor::{App, Config};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aitutor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API root to use instead of the configured one
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List courses
    Courses {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        difficulty: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one course with its lessons
    Course {
        id: String,
    },
    /// Enroll in a course
    Enroll {
        id: String,
    },
    /// Ask the AI tutor a one-off question
    Ask {
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print your dashboard numbers
    Dashboard,
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(tui: bool) -> Result<()> {
    let default = if tui { "aitutor=info" } else { "aitutor=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    let registry = tracing_subscriber::registry().with(filter);

    if tui {
        let path = Config::log_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        registry
            .with(fmt::layer().with_target(false).with_ansi(false).with_writer(std::sync::Mutex::new(file)))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false).with_writer(io::stderr)).init();
    }
    Ok(())
}

/// Client carrying the stored access token
fn signed_in_client(config: &Config) -> Result<TutorClient> {
    let tokens = TokenStore::load().context("Not signed in. Run `aitutor login` first")?;
    Ok(config.client()?.with_token(tokens.access))
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn login(config: &Config, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let client = config.client()?;
    let mut auth = AuthStore::default();
    if !auth.login(&client, &Credentials { email, password }).await {
        bail!("{}", auth.error().unwrap_or("Login failed"));
    }

    if let (Some(user), Some(tokens)) = (auth.user(), auth.tokens()) {
        TokenStore::save(tokens)?;
        let session = Session { user: Some(user.clone()), ..Session::load().unwrap_or_default() };
        session.save()?;
        println!("Signed in as {} ({})", user.display_name(), user.role);
    }
    Ok(())
}

fn logout() -> Result<()> {
    TokenStore::clear()?;
    Session::clear()?;
    println!("Signed out");
    Ok(())
}

async fn whoami(config: &Config) -> Result<()> {
    let client = signed_in_client(config)?;
    let mut auth = AuthStore::default();
    if !auth.fetch_profile(&client).await {
        bail!("{}", auth.error().unwrap_or("Failed to fetch profile"));
    }
    if let Some(user) = auth.user() {
        println!("{} <{}>", user.display_name(), user.email);
        println!("role: {}", user.role);
        if let Some(style) = &user.learning_style {
            println!("learning style: {}", style);
        }
    }
    if let Some(token) = client.token() {
        println!("token: {}", TokenStore::mask_token(token));
    }
    Ok(())
}

async fn list_courses(
    config: &Config,
    search: Option<String>,
    difficulty: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let client = signed_in_client(config)?;
    let mut filters = CourseFilters::new();
    for (key, value) in [("search", search), ("difficulty", difficulty), ("category", category)] {
        if let Some(value) = value {
            filters.insert(key.to_string(), value);
        }
    }

    let mut courses = CoursesStore::default();
    courses.fetch_courses(&client, &filters).await;
    if let Some(error) = courses.error() {
        bail!("{}", error);
    }
    if courses.courses().is_empty() {
        println!("No courses found");
    }
    for course in courses.courses() {
        println!("{:<38} {:<13} {}", course.id, course.difficulty, course.title);
    }
    Ok(())
}

async fn show_course(config: &Config, id: &str) -> Result<()> {
    let client = signed_in_client(config)?;
    let mut courses = CoursesStore::default();
    courses.fetch_course_detail(&client, id).await;
    let Some(course) = courses.current_course() else {
        bail!("{}", courses.error().unwrap_or("Failed to fetch course"));
    };

    println!("{}", course.title);
    if let Some(instructor) = &course.instructor {
        println!("by {}", instructor.full_name);
    }
    println!("{} | {} lessons | ~{}h", course.difficulty, course.total_lessons, course.estimated_duration);
    println!();
    println!("{}", textwrap::fill(&course.description, 80));
    if !course.lessons.is_empty() {
        println!();
        for (i, lesson) in course.lessons.iter().enumerate() {
            println!("{:>3}. {} ({}m)", i + 1, lesson.title, lesson.duration);
        }
    }
    Ok(())
}

async fn enroll(config: &Config, id: &str) -> Result<()> {
    let client = signed_in_client(config)?;
    let mut courses = CoursesStore::default();
    courses.enroll_course(&client, id).await;
    if let Some(error) = courses.error() {
        bail!("{}", error);
    }
    println!("Enrolled in {}", id);
    Ok(())
}

async fn ask(config: &Config, message: &str) -> Result<()> {
    let client = signed_in_client(config)?;
    let mut tutor = TutorStore::default();

    tutor.create_chat_session(&client, &NewChatSession::titled("New Chat")).await;
    let Some(session_id) = tutor.current_session().map(|s| s.id.clone()) else {
        bail!("{}", tutor.error().unwrap_or("Failed to create chat session"));
    };

    tutor.send_message(&client, &session_id, message).await;
    if let Some(error) = tutor.error() {
        bail!("{}", error);
    }
    if let Some(reply) = tutor.messages().last() {
        println!("{}", textwrap::fill(&reply.content, 100));
    }
    Ok(())
}

async fn dashboard(config: &Config) -> Result<()> {
    let client = signed_in_client(config)?;
    let mut auth = AuthStore::default();
    if !auth.fetch_profile(&client).await {
        bail!("{}", auth.error().unwrap_or("Failed to fetch profile"));
    }

    let mut dash = DashboardStore::default();
    if auth.user().map(|u| u.role) == Some(Role::Teacher) {
        dash.fetch_teacher_dashboard(&client).await;
        if let Some(data) = dash.teacher() {
            let s = &data.summary;
            println!(
                "courses: {}  students: {}  enrollments: {}",
                s.total_courses, s.total_students, s.total_enrollments
            );
            for course in &data.courses {
                println!(
                    "  {:<40} {:>4} students  {:>5.1}% progress  {:.1}★",
                    course.title, course.total_students, course.average_progress, course.average_rating
                );
            }
        }
    } else {
        dash.fetch_student_dashboard(&client).await;
        if let Some(data) = dash.student() {
            let a = &data.analytics;
            println!(
                "study time: {}m  streak: {}d  enrolled: {}  completed: {}  avg quiz: {:.0}%",
                a.total_study_time,
                a.current_streak,
                a.courses_enrolled,
                a.courses_completed,
                a.average_quiz_score
            );
            for quiz in &data.recent_quizzes {
                let mark = if quiz.passed { "passed" } else { "failed" };
                println!("  {:<40} {:>5.0}%  {}", quiz.quiz_title, quiz.score, mark);
            }
        }
    }
    if let Some(error) = dash.error() {
        bail!("{}", error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none())?;

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    match cli.command {
        Some(Commands::Login { email, password }) => login(&config, email, password).await?,
        Some(Commands::Logout) => logout()?,
        Some(Commands::Whoami) => whoami(&config).await?,
        Some(Commands::Courses { search, difficulty, category }) => {
            list_courses(&config, search, difficulty, category).await?
        }
        Some(Commands::Course { id }) => show_course(&config, &id).await?,
        Some(Commands::Enroll { id }) => enroll(&config, &id).await?,
        Some(Commands::Ask { message }) => ask(&config, &message.join(" ")).await?,
        Some(Commands::Dashboard) => dashboard(&config).await?,
        None => {
            // Launch TUI
            let client = config.client()?;
            let mut app = App::new(config, client)?;
            app.run().await?;
        }
    }

    Ok(())
}
