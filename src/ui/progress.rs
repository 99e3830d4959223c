use crate::output::is_quiet;
use crate::ui::progress_message::{ProgressMessage, ProgressPhase};
use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{HumanDuration, MultiProgress, ProgressBar};
use owo_colors::OwoColorize;
use std::thread;
use std::time::Duration;

fn visible() -> bool {
    console::Term::stdout().is_term() && !is_quiet()
}

/// Renders phase progress from messages sent over a channel.
///
/// The renderer runs on its own thread; dropping every sender (or sending
/// [`ProgressMessage::Exit`]) ends it. Call [`ProgressManager::finish`] to wait.
pub struct ProgressManager {
    mp: MultiProgress,
    handle: Option<thread::JoinHandle<usize>>,
}

impl ProgressManager {
    pub fn new(total_files: usize) -> (Self, crossbeam::channel::Sender<ProgressMessage>) {
        let (tx, rx) = crossbeam::channel::unbounded::<ProgressMessage>();

        let mp = MultiProgress::new();
        let bar = |pb: ProgressBar| if visible() { mp.add(pb) } else { ProgressBar::hidden() };

        let parsing = bar(ProgressBar::new(total_files as u64).with_message(ProgressPhase::Parsing.label()));
        let registration = bar(ProgressBar::new_spinner().with_message(ProgressPhase::Registration.label()));
        let resolution = bar(ProgressBar::new_spinner().with_message(ProgressPhase::Resolution.label()));

        let handle = thread::spawn(move || {
            let mut skipped = 0;
            let pick = |phase: ProgressPhase| match phase {
                ProgressPhase::Parsing => &parsing,
                ProgressPhase::Registration => &registration,
                ProgressPhase::Resolution => &resolution,
            };

            for msg in rx {
                match msg {
                    ProgressMessage::Started { phase, total } => {
                        let pb = pick(phase);
                        if phase == ProgressPhase::Parsing {
                            pb.set_length(total as u64);
                        } else {
                            pb.enable_steady_tick(Duration::from_millis(100));
                        }
                    }
                    ProgressMessage::Progress { phase, file } => {
                        let pb = pick(phase);
                        pb.inc(1);
                        if let Some(f) = file {
                            pb.set_message(format!("{}: {}", phase.label(), f));
                        }
                    }
                    ProgressMessage::Finished { phase } => {
                        pick(phase).finish_with_message(format!("{} done", phase.label()));
                    }
                    ProgressMessage::Skipped(file) => {
                        skipped += 1;
                        tracing::debug!("progress: skipped {}", file);
                    }
                    ProgressMessage::Exit => break,
                }
            }
            skipped
        });

        (
            Self {
                mp,
                handle: Some(handle),
            },
            tx,
        )
    }

    pub fn clear(&self) {
        self.mp.clear().ok();
    }

    /// Wait for the renderer to drain; returns how many files were reported skipped
    pub fn finish(mut self) -> usize {
        let skipped = self
            .handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0);
        self.clear();
        skipped
    }

    pub fn finish_with_summary(duration: Duration, files: usize, references: usize, unresolved: usize) {
        if is_quiet() {
            return;
        }
        println!();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("Complete in {}", HumanDuration(duration)).style(theme().success.clone())
        );
        println!(
            "  {} {}  {} {}  {} {}",
            Icons::FILE.style(theme().info.clone()),
            files,
            Icons::LINK.style(theme().info.clone()),
            references,
            Icons::CROSS.style(theme().info.clone()),
            unresolved
        );
    }
}
