use chrono::{Local, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use fitlife_core::assistant::{AssistantSettings, Reminder};
use fitlife_core::progress::{weekly_stats, workout_summary};
use fitlife_core::store::resolve_id;
use fitlife_core::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fitlife")]
#[command(about = "Personal fitness assistant: workouts, meal plans and medicine reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest the next workout from recent history
    Suggest {
        /// Log the suggestion as a completed workout
        #[arg(long)]
        accept: bool,
    },

    /// Meal-plan analysis
    Menu {
        #[command(subcommand)]
        command: MenuCommand,
    },

    /// Log and list workouts
    Workout {
        #[command(subcommand)]
        command: WorkoutCommand,
    },

    /// Medicine schedule and reminders
    Med {
        #[command(subcommand)]
        command: MedCommand,
    },

    /// Todo list
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },

    /// Show or update the profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Weekly progress summary
    Progress,

    /// Export the workout log to CSV
    Export {
        /// Output file (defaults to workouts.csv in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum MenuCommand {
    /// Score a meal plan against a fitness goal
    #[command(group(ArgGroup::new("source").required(true).args(["file", "text"])))]
    Analyze {
        /// Read the menu from a text file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Menu text
        #[arg(long)]
        text: Option<String>,

        /// Goal to analyze for (bulking, cutting, maintenance); defaults to the profile goal
        #[arg(long)]
        goal: Option<FitnessGoal>,
    },
}

#[derive(Subcommand)]
enum WorkoutCommand {
    /// Log a workout
    Log {
        /// Muscle group (chest, back, shoulders, arms, legs, core, full-body)
        #[arg(long)]
        group: MuscleGroup,

        /// Exercise as NAME:SETSxREPS[@WEIGHT], e.g. "Bench Press:4x8@135"
        #[arg(long = "exercise", short = 'e', required = true, value_parser = parse_exercise)]
        exercises: Vec<ExerciseEntry>,

        /// Duration in minutes
        #[arg(long, default_value_t = 0)]
        duration: u32,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List logged workouts, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum MedCommand {
    /// Add a medicine
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        dosage: String,

        /// Scheduled time of day, HH:MM
        #[arg(long, value_parser = parse_time_of_day)]
        time: chrono::NaiveTime,

        /// daily, weekly or as-needed
        #[arg(long, default_value = "daily")]
        frequency: Frequency,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List medicines by scheduled time
    List,

    /// Today's checklist
    Today,

    /// Mark a medicine taken now
    Take {
        /// Medicine id or unique id prefix
        id: String,
    },

    /// Delete a medicine
    Delete {
        /// Medicine id or unique id prefix
        id: String,
    },

    /// Medicines due right now
    Due,

    /// Next scheduled medicines
    Upcoming {
        /// Number of entries (defaults to reminders.upcoming_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum TodoCommand {
    /// Add a todo
    Add {
        text: String,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },

    /// List todos, newest first
    List,

    /// Mark a todo completed
    Done { id: String },

    /// Mark a todo not completed
    Undo { id: String },

    /// Delete a todo
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Show the profile
    Show,

    /// Update profile fields
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        goal: Option<FitnessGoal>,

        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,

        /// Height in cm
        #[arg(long)]
        height: Option<f64>,

        #[arg(long)]
        age: Option<u32>,
    },
}

type CliAssistant = Assistant<FileStore, Box<dyn TextGenerator>, SystemClock, JsonlAuditLog>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    fitlife_core::logging::init_for_cli(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let assistant = build_assistant(&data_dir, &config);
    let json = cli.json;

    match cli.command {
        Commands::Suggest { accept } => cmd_suggest(&assistant, accept, json),
        Commands::Menu {
            command: MenuCommand::Analyze { file, text, goal },
        } => cmd_menu_analyze(&assistant, file, text, goal, json),
        Commands::Workout { command } => cmd_workout(assistant.store(), command, json),
        Commands::Med { command } => cmd_med(&assistant, command, &config, json),
        Commands::Todo { command } => cmd_todo(assistant.store(), command, json),
        Commands::Profile { command } => cmd_profile(assistant.store(), command, json),
        Commands::Progress => cmd_progress(assistant.store(), json),
        Commands::Export { output } => {
            let output = output.unwrap_or_else(|| data_dir.join("workouts.csv"));
            cmd_export(assistant.store(), &output, json)
        }
    }
}

fn build_assistant(data_dir: &Path, config: &Config) -> CliAssistant {
    let generator: Box<dyn TextGenerator> = match OpenAiClient::from_config(&config.ai) {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::info!("Generative service unavailable, using fallbacks: {}", e);
            Box::new(UnavailableGenerator::new(e.to_string()))
        }
    };

    Assistant::new(
        FileStore::new(data_dir),
        generator,
        SystemClock,
        JsonlAuditLog::new(data_dir.join("audit.jsonl")),
        AssistantSettings::from(config),
    )
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Parse `NAME:SETSxREPS[@WEIGHT]`
fn parse_exercise(s: &str) -> std::result::Result<ExerciseEntry, String> {
    let usage = || format!("expected NAME:SETSxREPS[@WEIGHT], got {s:?}");

    let (name, prescription) = s.rsplit_once(':').ok_or_else(usage)?;
    let (volume, weight) = match prescription.split_once('@') {
        Some((volume, weight)) => {
            let weight = weight.trim().parse::<f64>().map_err(|_| usage())?;
            (volume, weight)
        }
        None => (prescription, 0.0),
    };
    let (sets, reps) = volume
        .to_lowercase()
        .split_once('x')
        .map(|(sets, reps)| (sets.trim().parse::<u32>(), reps.trim().parse::<u32>()))
        .ok_or_else(usage)?;

    Ok(ExerciseEntry::new(
        name.trim(),
        sets.map_err(|_| usage())?,
        reps.map_err(|_| usage())?,
        weight,
    ))
}

fn format_weight(weight: f64) -> String {
    if weight > 0.0 {
        format!("@ {} lbs", weight)
    } else {
        "(bodyweight)".to_string()
    }
}

fn print_source(source: &AdviceSource) {
    match source {
        AdviceSource::Generated => println!("  Source: AI"),
        AdviceSource::Fallback { reason } => println!("  Source: fallback ({})", reason),
    }
}

// ============================================================================
// AI commands
// ============================================================================

fn cmd_suggest(assistant: &CliAssistant, accept: bool, json: bool) -> Result<()> {
    let advice = assistant.suggest_workout()?;
    let logged = if accept {
        Some(assistant.accept_suggestion(&advice.value)?)
    } else {
        None
    };

    if json {
        return print_json(&serde_json::json!({
            "suggestion": advice.value,
            "source": advice.source,
            "logged": logged,
        }));
    }

    let suggestion = &advice.value;
    println!("\nSuggested workout: {}", suggestion.muscle_group);
    print_source(&advice.source);
    println!();
    println!("  {}", suggestion.reasoning);
    println!();
    for exercise in &suggestion.exercises {
        println!(
            "  → {}: {} x {} {}",
            exercise.name,
            exercise.sets,
            exercise.reps,
            format_weight(exercise.weight)
        );
    }
    if let Some(tips) = &suggestion.tips {
        println!();
        println!("  Tip: {}", tips);
    }

    if let Some(record) = logged {
        println!("\n✓ Workout logged ({})", short_id(&record.id));
    }
    Ok(())
}

fn cmd_menu_analyze(
    assistant: &CliAssistant,
    file: Option<PathBuf>,
    text: Option<String>,
    goal: Option<FitnessGoal>,
    json: bool,
) -> Result<()> {
    let menu_text = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(text)) => text,
        (None, None) => return Err(Error::validation("menu text is required")),
    };

    let advice = assistant.analyze_menu(&menu_text, goal)?;

    if json {
        return print_json(&advice);
    }

    let analysis = &advice.value;
    println!("\nMenu score: {}/100", analysis.score);
    print_source(&advice.source);
    println!("  Goal alignment: {}", analysis.goal_alignment);
    println!("  Macro balance: {}", analysis.macro_balance);
    println!("  Calories: {}", analysis.calorie_assessment);

    if !analysis.highlights.is_empty() {
        println!("\n  Highlights:");
        for highlight in &analysis.highlights {
            println!("    + {}", highlight);
        }
    }
    if !analysis.recommendations.is_empty() {
        println!("\n  Recommendations:");
        for recommendation in &analysis.recommendations {
            println!("    → {}", recommendation);
        }
    }
    Ok(())
}

// ============================================================================
// Workouts
// ============================================================================

fn cmd_workout(store: &FileStore, command: WorkoutCommand, json: bool) -> Result<()> {
    match command {
        WorkoutCommand::Log {
            group,
            exercises,
            duration,
            notes,
        } => {
            let record = store.log_workout(
                NewWorkout {
                    muscle_group: group,
                    duration_minutes: duration,
                    notes,
                    exercises,
                },
                Utc::now(),
            )?;

            if json {
                return print_json(&record);
            }
            println!(
                "✓ Logged {} workout with {} exercises ({})",
                record.muscle_group,
                record.exercises.len(),
                short_id(&record.id)
            );
        }

        WorkoutCommand::List { limit } => {
            let mut workouts = store.workouts()?;
            if let Some(limit) = limit {
                workouts.truncate(limit);
            }

            if json {
                return print_json(&workouts);
            }
            if workouts.is_empty() {
                println!("No workouts logged yet.");
            }
            for workout in &workouts {
                println!(
                    "{}  {}  {}  {} min",
                    short_id(&workout.id),
                    workout.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    workout.muscle_group,
                    workout.duration_minutes
                );
                for exercise in &workout.exercises {
                    println!(
                        "    {}: {} x {} {}",
                        exercise.name,
                        exercise.sets,
                        exercise.reps,
                        format_weight(exercise.weight)
                    );
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Medicines
// ============================================================================

fn print_medicine_line(medicine: &Medicine, suffix: &str) {
    println!(
        "{}  {}  {} ({}, {}){}",
        short_id(&medicine.id),
        medicine.scheduled_time.format("%H:%M"),
        medicine.name,
        medicine.dosage,
        medicine.frequency,
        suffix
    );
}

fn print_reminders(reminders: &[Reminder], empty: &str) {
    if reminders.is_empty() {
        println!("{}", empty);
    }
    for reminder in reminders {
        let suffix = if reminder.is_due_now {
            "  DUE NOW".to_string()
        } else {
            format!("  in {} min", reminder.minutes_until_next)
        };
        print_medicine_line(&reminder.medicine, &suffix);
    }
}

fn cmd_med(assistant: &CliAssistant, command: MedCommand, config: &Config, json: bool) -> Result<()> {
    let store = assistant.store();

    match command {
        MedCommand::Add {
            name,
            dosage,
            time,
            frequency,
            notes,
        } => {
            let medicine = store.add_medicine(
                NewMedicine {
                    name,
                    dosage,
                    scheduled_time: time,
                    frequency,
                    notes,
                },
                Utc::now(),
            )?;

            if json {
                return print_json(&medicine);
            }
            println!(
                "✓ Added {} at {} ({})",
                medicine.name,
                medicine.scheduled_time.format("%H:%M"),
                short_id(&medicine.id)
            );
        }

        MedCommand::List => {
            let medicines = store.medicines()?;
            if json {
                return print_json(&medicines);
            }
            if medicines.is_empty() {
                println!("No medicines scheduled.");
            }
            for medicine in &medicines {
                print_medicine_line(medicine, "");
            }
        }

        MedCommand::Today => {
            let medicines = store.medicines()?;
            let now = assistant.clock().now();
            let today = todays_medicines(&medicines, &now);

            if json {
                return print_json(&today);
            }
            if today.is_empty() {
                println!("Nothing scheduled today.");
            }
            for entry in &today {
                let mark = if entry.taken_today { "  ✓ taken" } else { "" };
                print_medicine_line(entry.medicine, mark);
            }
        }

        MedCommand::Take { id } => {
            let medicines = store.medicines()?;
            let id = resolve_id(&medicines, |m| m.id, &id, "medicine")?;
            let medicine = store.mark_medicine_taken(id, Utc::now())?;

            if json {
                return print_json(&medicine);
            }
            println!("✓ Marked {} taken", medicine.name);
        }

        MedCommand::Delete { id } => {
            let medicines = store.medicines()?;
            let id = resolve_id(&medicines, |m| m.id, &id, "medicine")?;
            let medicine = store.delete_medicine(id)?;

            if json {
                return print_json(&medicine);
            }
            println!("✓ Deleted {}", medicine.name);
        }

        MedCommand::Due => {
            let due = assistant.due_reminders()?;
            if json {
                return print_json(&due);
            }
            print_reminders(&due, "No medicines due right now.");
        }

        MedCommand::Upcoming { limit } => {
            let limit = limit.unwrap_or(config.reminders.upcoming_limit);
            let next = assistant.upcoming_reminders(limit)?;
            if json {
                return print_json(&next);
            }
            print_reminders(&next, "No daily medicines scheduled.");
        }
    }
    Ok(())
}

// ============================================================================
// Todos
// ============================================================================

fn cmd_todo(store: &FileStore, command: TodoCommand, json: bool) -> Result<()> {
    let resolve = |id: &str| -> Result<uuid::Uuid> {
        let todos = store.todos()?;
        resolve_id(&todos, |t| t.id, id, "todo")
    };

    let todo = match command {
        TodoCommand::Add { text, priority } => store.add_todo(&text, priority, Utc::now())?,
        TodoCommand::Done { id } => store.set_todo_completed(resolve(&id)?, true, Utc::now())?,
        TodoCommand::Undo { id } => store.set_todo_completed(resolve(&id)?, false, Utc::now())?,
        TodoCommand::Delete { id } => {
            let todo = store.delete_todo(resolve(&id)?)?;
            if json {
                return print_json(&todo);
            }
            println!("✓ Deleted {:?}", todo.text);
            return Ok(());
        }
        TodoCommand::List => {
            let todos = store.todos()?;
            if json {
                return print_json(&todos);
            }
            if todos.is_empty() {
                println!("No todos.");
            }
            for todo in &todos {
                print_todo_line(todo);
            }
            return Ok(());
        }
    };

    if json {
        return print_json(&todo);
    }
    print_todo_line(&todo);
    Ok(())
}

fn print_todo_line(todo: &Todo) {
    println!(
        "{}  [{}] {} ({})",
        short_id(&todo.id),
        if todo.completed { "x" } else { " " },
        todo.text,
        todo.priority
    );
}

// ============================================================================
// Profile, progress, export
// ============================================================================

fn cmd_profile(store: &FileStore, command: ProfileCommand, json: bool) -> Result<()> {
    let mut profile = store.profile()?;

    if let ProfileCommand::Set {
        name,
        goal,
        weight,
        height,
        age,
    } = command
    {
        for (field, value) in [("weight", weight), ("height", height)] {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(Error::validation(format!("{field} must be positive")));
                }
            }
        }

        if let Some(name) = name {
            profile.name = name.trim().to_string();
        }
        if let Some(goal) = goal {
            profile.fitness_goal = goal;
        }
        if weight.is_some() {
            profile.weight_kg = weight;
        }
        if height.is_some() {
            profile.height_cm = height;
        }
        if age.is_some() {
            profile.age = age;
        }
        store.save_profile(&profile)?;
    }

    if json {
        return print_json(&profile);
    }

    let or_not_set = |value: Option<String>| value.unwrap_or_else(|| "not set".to_string());
    println!(
        "Name:   {}",
        or_not_set(Some(profile.name.clone()).filter(|n| !n.is_empty()))
    );
    println!("Goal:   {}", profile.fitness_goal);
    println!("Weight: {}", or_not_set(profile.weight_kg.map(|w| format!("{w} kg"))));
    println!("Height: {}", or_not_set(profile.height_cm.map(|h| format!("{h} cm"))));
    println!("Age:    {}", or_not_set(profile.age.map(|a| a.to_string())));
    Ok(())
}

fn cmd_progress(store: &FileStore, json: bool) -> Result<()> {
    let workouts = store.workouts()?;
    let todos = store.todos()?;
    let stats = weekly_stats(&workouts, &todos, Utc::now());
    let summary = workout_summary(&workouts);

    if json {
        return print_json(&serde_json::json!({
            "weekly": stats,
            "workouts": summary,
        }));
    }

    println!("\n{}", stats.message);
    println!();
    println!(
        "  Workouts this week: {} ({}% of weekly target)",
        stats.weekly_workouts, stats.workout_progress
    );
    println!(
        "  Tasks completed:    {}/{} ({}%)",
        stats.completed_todos, stats.total_todos, stats.completion_rate
    );
    println!("  Tasks this week:    {}", stats.weekly_todos);
    println!();
    println!("  Total workouts:     {}", summary.total_workouts);
    println!("  Total exercises:    {}", summary.total_exercises);
    println!("  Average duration:   {} min", summary.average_duration_minutes);
    Ok(())
}

fn cmd_export(store: &FileStore, output: &Path, json: bool) -> Result<()> {
    let workouts = store.workouts()?;
    let rows = fitlife_core::export::export_workouts_csv(&workouts, output)?;

    if json {
        return print_json(&serde_json::json!({
            "rows": rows,
            "path": output,
        }));
    }
    println!("✓ Exported {} exercise rows to CSV", rows);
    println!("  CSV: {}", output.display());
    Ok(())
}
