use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use parking_lot::Mutex;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::app_config::Config;
use crate::credentials::{CredentialStore, Service};
use crate::gloss::GroqGlossTranslator;
use crate::pipeline::{
    Pipeline, PipelineRun, RenderOutcome, RunInput, Submission,
};
use crate::render::{self, RenderProgress, VideoJobState};
use crate::transcribe::GroqTranscriber;

// @module: Application controller for the interactive surface

/// Number of runs kept in the in-memory history
const HISTORY_CAPACITY: usize = 10;

/// One archived run shown in the history listing
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Run identifier
    pub id: Uuid,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// The recognized or typed text
    pub transcript: String,
    /// The gloss summary line
    pub summary: String,
    /// The rendered video URL, when the run was rendered
    pub video_url: Option<String>,
}

/// Main application controller for the sign production pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Orchestrator wired with the available adapters
    pipeline: Pipeline,
    // @field: Coarse render progress indicator
    spinner: Arc<ProgressBar>,
    // @field: Recent runs, newest first
    history: Mutex<Vec<HistoryEntry>>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, credentials: &CredentialStore) -> Result<Self> {
        let spinner = Arc::new(Self::build_spinner());
        let pipeline = Self::build_pipeline(&config, credentials, Arc::clone(&spinner));

        Ok(Self {
            config,
            pipeline,
            spinner,
            history: Mutex::new(Vec::new()),
        })
    }

    /// Create a controller with default configuration and no credentials,
    /// for test purposes
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default(), &CredentialStore::from_pairs(&[]))
    }

    fn build_spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner
    }

    fn build_pipeline(
        config: &Config,
        credentials: &CredentialStore,
        spinner: Arc<ProgressBar>,
    ) -> Pipeline {
        let mut pipeline = Pipeline::new();

        if let Some(groq_key) = credentials.get(Service::Groq) {
            pipeline = pipeline
                .with_transcriber(Arc::new(GroqTranscriber::new(
                    groq_key,
                    config.transcription.clone(),
                )))
                .with_translator(Arc::new(GroqGlossTranslator::new(
                    groq_key,
                    config.reasoning.clone(),
                )));
        }

        let observer_spinner = Arc::clone(&spinner);
        let observer: render::ProgressObserver = Arc::new(move |progress: RenderProgress| {
            let message = match progress.state {
                VideoJobState::Submitted => "Render job submitted".to_string(),
                VideoJobState::Running => format!(
                    "Synthesizing video (poll {}/{})",
                    progress.attempt, progress.max_attempts
                ),
                VideoJobState::Done => "Render complete".to_string(),
                VideoJobState::Failed => "Render failed".to_string(),
            };
            observer_spinner.set_message(message);
        });

        if let Some(backend) = render::build_backend(&config.render, credentials, Some(observer)) {
            pipeline = pipeline.with_renderer(backend);
        }

        pipeline
    }

    /// Whether the controller has a usable reasoning path
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Recent runs, newest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().clone()
    }

    fn archive_run(&self, run: &PipelineRun) {
        let Some(document) = &run.document else {
            return;
        };
        let entry = HistoryEntry {
            id: run.id,
            timestamp: run.started_at,
            transcript: run.transcript.clone().unwrap_or_default(),
            summary: document.summary(),
            video_url: run.video.as_ref().map(|v| v.url.clone()),
        };

        let mut history = self.history.lock();
        history.insert(0, entry);
        history.truncate(HISTORY_CAPACITY);
    }

    /// Run a single pipeline pass and print the results.
    /// `render` triggers the video stage automatically once the run is
    /// ready; interactive mode asks instead.
    pub async fn run_once(&self, input: RunInput, render: bool) -> Result<()> {
        let submission = match self.pipeline.submit(input).await {
            Ok(submission) => submission,
            Err(e) => {
                return Err(anyhow!("{}", e));
            }
        };

        let mut run = match submission {
            Submission::Warned(warning) => {
                // Precondition failure, already logged as a warning
                println!("! {}", warning);
                return Ok(());
            }
            Submission::Run(run) => run,
        };

        self.display_run(&run)?;

        if render {
            self.render_run(&mut run).await?;
        }

        self.archive_run(&run);
        Ok(())
    }

    fn display_run(&self, run: &PipelineRun) -> Result<()> {
        let document = run
            .document
            .as_ref()
            .ok_or_else(|| anyhow!("run holds no document to display"))?;

        println!("{}", serde_json::to_string_pretty(document)?);
        println!();
        println!("ISL GLOSS: {}", document.summary());
        Ok(())
    }

    async fn render_run(&self, run: &mut PipelineRun) -> Result<()> {
        self.spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner
            .set_message(format!("Connecting to {} backend", self.config.render.provider));

        let outcome = self.pipeline.render(run).await;
        self.spinner.finish_and_clear();

        match outcome {
            Ok(RenderOutcome::Rendered(locator)) => {
                println!("VIDEO: {}", locator);
                Ok(())
            }
            Ok(RenderOutcome::Warned(warning)) => {
                println!("! {}", warning);
                Ok(())
            }
            Err(e) => Err(anyhow!("{}", e)),
        }
    }

    fn print_history(&self) {
        let history = self.history();
        if history.is_empty() {
            println!("(no runs yet)");
            return;
        }
        for entry in &history {
            let video = entry.video_url.as_deref().unwrap_or("-");
            println!(
                "{}  {}  \"{}\"  gloss: {}  video: {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.id,
                entry.transcript,
                entry.summary,
                video
            );
        }
    }

    fn read_line(prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        let mut line = String::new();
        let read = std::io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn parse_input(line: &str) -> Result<RunInput> {
        if let Some(path) = line.strip_prefix('@') {
            let path = Path::new(path.trim());
            let audio = std::fs::read(path)
                .map_err(|e| anyhow!("Could not read audio file {}: {}", path.display(), e))?;
            info!("Loaded {} bytes of audio from {}", audio.len(), path.display());
            Ok(RunInput::Audio(audio))
        } else {
            Ok(RunInput::Text(line.to_string()))
        }
    }

    /// Interactive session: read input lines, run the pipeline, offer the
    /// render trigger after each successful translation. One run at a time;
    /// new input is not read until the current run reaches a terminal state.
    pub async fn run_interactive(&self) -> Result<()> {
        println!("signwave - speech to ISL production pipeline");
        println!("Type English text, @path/to/audio.wav for audio, 'history', or 'quit'.");

        if !self.pipeline.can_transcribe() {
            warn!("Audio input disabled: no Groq credential configured");
        }

        loop {
            let Some(line) = Self::read_line("signwave> ")? else {
                break;
            };
            if line.is_empty() {
                continue;
            }
            match line.as_str() {
                "quit" | "exit" => break,
                "history" => {
                    self.print_history();
                    continue;
                }
                _ => {}
            }

            let input = match Self::parse_input(&line) {
                Ok(input) => input,
                Err(e) => {
                    println!("! {}", e);
                    continue;
                }
            };

            let submission = match self.pipeline.submit(input).await {
                Ok(submission) => submission,
                Err(e) => {
                    println!("! {}", e);
                    continue;
                }
            };

            let mut run = match submission {
                Submission::Warned(warning) => {
                    println!("! {}", warning);
                    continue;
                }
                Submission::Run(run) => run,
            };

            self.display_run(&run)?;

            if self.pipeline.can_render() {
                if let Some(answer) = Self::read_line("Render video? [y/N] ")? {
                    if answer.eq_ignore_ascii_case("y") {
                        if let Err(e) = self.render_run(&mut run).await {
                            println!("! {}", e);
                        }
                    }
                }
            }

            self.archive_run(&run);
        }

        Ok(())
    }
}
