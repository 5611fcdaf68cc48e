//! Install command: the acquisition–merge–configure pipeline
//!
//! Sequences validation, skeleton acquisition, component acquisition (local
//! directory in Custom mode, fetched default otherwise), tree merge, and
//! artifact synchronization. Every stage transition is reported on the
//! console so a failed run leaves a diagnosable trail; any error is terminal
//! and surfaces as a non-zero exit from `main`.

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{LocalizationConfig, Mode};
use crate::error::{LadError, Result};
use crate::fetch::{Fetch, HttpFetcher};
use crate::{acquire, artifacts, merge};

/// Name of the run configuration file under the working root
const CONFIG_FILE: &str = "config.json";

/// Subdirectory of the skeleton that receives the merged component
const LIB_COMPONENT_DIR: &str = "lib_component";

/// Run the install command against the resolved working root
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let root = super::resolve_workspace(workspace)?;
    let pipeline = InstallPipeline::new(&root, &HttpFetcher);

    match pipeline.run() {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!(
                "{} {}",
                style("Install failed during:").red().bold(),
                pipeline.stage()
            );
            Err(e)
        }
    }
}

/// Pipeline stages, in execution order
///
/// The failed terminal state is the `Err` returned from
/// [`InstallPipeline::run`]; [`InstallPipeline::stage`] then reports where
/// the pipeline stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    AcquiringSkeleton,
    AcquiringComponent,
    Merging,
    Synchronizing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Validating => "validating configuration",
            Stage::AcquiringSkeleton => "acquiring project skeleton",
            Stage::AcquiringComponent => "acquiring component source",
            Stage::Merging => "merging component into project",
            Stage::Synchronizing => "synchronizing project artifacts",
            Stage::Done => "done",
        };
        f.write_str(label)
    }
}

/// The install pipeline, generic over the transfer implementation
pub struct InstallPipeline<'a> {
    root: &'a Path,
    fetcher: &'a dyn Fetch,
    stage: Cell<Stage>,
}

impl<'a> InstallPipeline<'a> {
    pub fn new(root: &'a Path, fetcher: &'a dyn Fetch) -> Self {
        Self {
            root,
            fetcher,
            stage: Cell::new(Stage::Validating),
        }
    }

    /// The stage the pipeline last entered
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    /// Execute the full pipeline
    pub fn run(&self) -> Result<()> {
        self.advance(Stage::Validating);
        let config = LocalizationConfig::load(&self.root.join(CONFIG_FILE))?;
        let mode = config.validate()?;

        self.advance(Stage::AcquiringSkeleton);
        let project = acquire::skeleton(self.fetcher, self.root, acquire::SKELETON_URL)?;

        self.advance(Stage::AcquiringComponent);
        let component_src = self.acquire_component(&config, mode)?;

        self.advance(Stage::Merging);
        let lib_dir = project.join(LIB_COMPONENT_DIR);
        std::fs::create_dir_all(&lib_dir)
            .map_err(|e| crate::error::file_write_error(&lib_dir, e))?;
        self.merge_component(&component_src, &lib_dir)?;

        self.advance(Stage::Synchronizing);
        let identity = config.identity(mode);
        artifacts::synchronize(&project, &identity, mode, &config)?;

        self.advance(Stage::Done);
        println!(
            "{}",
            style("Localization complete, open the project with your IDE.").green()
        );
        Ok(())
    }

    /// Resolve the component source tree for the run's mode
    ///
    /// Custom mode references the configured local directory and performs no
    /// network I/O; Default mode fetches the fixed default component.
    fn acquire_component(&self, config: &LocalizationConfig, mode: Mode) -> Result<PathBuf> {
        match mode {
            Mode::Custom => {
                let configured = config.local_src_path.as_deref().unwrap_or_default();
                let source = if Path::new(configured).is_absolute() {
                    PathBuf::from(configured)
                } else {
                    self.root.join(configured)
                };
                if !source.is_dir() {
                    return Err(LadError::ComponentSourceMissing {
                        path: source.display().to_string(),
                    });
                }
                Ok(source)
            }
            Mode::Default => {
                acquire::default_component(self.fetcher, self.root, acquire::DEFAULT_COMPONENT_URL)
            }
        }
    }

    /// Merge the component tree, reporting per-file progress
    ///
    /// Every copy completes before the merge returns; the pipeline never
    /// leaves the Merging stage with writes still in flight.
    fn merge_component(&self, source: &Path, dest: &Path) -> Result<()> {
        let total = merge::count_files(source)?;
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40.green/yellow}] {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        merge::merge_tree_with(source, dest, &mut |_| bar.inc(1))?;
        bar.finish_and_clear();
        Ok(())
    }

    fn advance(&self, stage: Stage) {
        self.stage.set(stage);
        println!("{} {}", style("::").cyan().bold(), stage);
    }
}
