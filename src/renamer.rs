//! The rename workflow: hash, dedup, title extraction, confirmation,
//! rename and archive move.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};

use crate::fingerprint::{FingerprintSet, hash_file};
use crate::interrupt;
use crate::prompt::{CandidateChoice, Confirmation, FileChoice, RunMode};
use crate::title::TitleSource;

#[derive(Clone, Debug)]
pub struct RenameConfig {
    /// Prefix for files whose content duplicates an earlier file.
    pub dup_prefix: String,
    /// Subfolder under the target directory that renamed files move into.
    pub archive_dir: String,
    /// Start in bulk mode, never prompting.
    pub assume_yes: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            dup_prefix: "dup_".to_string(),
            archive_dir: "auto_renamed_pdf".to_string(),
            assume_yes: false,
        }
    }
}

/// Counters reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Candidate files seen, duplicates and skips included.
    pub scanned: usize,
    /// Successful renames only.
    pub renamed: usize,
    /// The run stopped early on user abort or interrupt.
    pub aborted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FileOutcome {
    Renamed,
    NotRenamed,
    Duplicate,
    Skipped,
    Aborted,
}

pub struct Renamer<'a> {
    config: RenameConfig,
    titles: &'a dyn TitleSource,
    prompt: &'a mut dyn Confirmation,
    /// Cancellation flag, checked between files and after every prompt.
    stop: &'a AtomicBool,
    bulk: bool,
}

impl<'a> Renamer<'a> {
    /// Wired to the process-wide interrupt flag; see [`with_stop`](Self::with_stop)
    /// to supply a custom cancellation flag.
    pub fn new(
        config: RenameConfig,
        titles: &'a dyn TitleSource,
        prompt: &'a mut dyn Confirmation,
    ) -> Self {
        Self::with_stop(config, titles, prompt, interrupt::flag())
    }

    pub fn with_stop(
        config: RenameConfig,
        titles: &'a dyn TitleSource,
        prompt: &'a mut dyn Confirmation,
        stop: &'a AtomicBool,
    ) -> Self {
        let bulk = config.assume_yes;
        Self { config, titles, prompt, stop, bulk }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Process a directory of PDFs or a single PDF file.
    pub fn run(&mut self, target: &Path) -> Result<RunSummary> {
        if target.is_dir() {
            self.run_dir(target)
        } else {
            self.run_file(target)
        }
    }

    /// Rename every `.pdf` file directly under `dir`.
    pub fn run_dir(&mut self, dir: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let names = list_pdfs(dir)?;
        if names.is_empty() {
            info!("No pdf files found in {}", dir.display());
            return Ok(summary);
        }

        if !self.bulk {
            let mode = self.prompt.run_mode();
            if self.stopped() {
                summary.aborted = true;
                return Ok(summary);
            }
            match mode {
                RunMode::BulkAll => self.bulk = true,
                RunMode::OneByOne => {}
                RunMode::Abort => {
                    summary.aborted = true;
                    return Ok(summary);
                }
            }
        }

        let mut fingerprints = FingerprintSet::new();
        for name in &names {
            if self.stopped() {
                info!("Interrupted, stopping");
                summary.aborted = true;
                break;
            }
            summary.scanned += 1;
            match self.process_file(dir, name, &mut fingerprints) {
                Ok(FileOutcome::Renamed) => summary.renamed += 1,
                Ok(FileOutcome::Aborted) => {
                    summary.aborted = true;
                    break;
                }
                Ok(_) => {}
                // per-file failures never stop the run
                Err(err) => warn!("{name}: {err:#}"),
            }
        }
        Ok(summary)
    }

    /// Rename one PDF file given directly on the command line.
    /// The path must carry the (case-sensitive) `.pdf` suffix.
    pub fn run_file(&mut self, path: &Path) -> Result<RunSummary> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            bail!("{} has no usable file name", path.display());
        };
        if !name.ends_with(".pdf") {
            bail!("{} is not a pdf file", path.display());
        }
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut summary = RunSummary::default();
        summary.scanned = 1;
        let mut fingerprints = FingerprintSet::new();
        match self.process_file(dir, name, &mut fingerprints) {
            Ok(FileOutcome::Renamed) => summary.renamed = 1,
            Ok(FileOutcome::Aborted) => summary.aborted = true,
            Ok(_) => {}
            Err(err) => warn!("{name}: {err:#}"),
        }
        Ok(summary)
    }

    fn process_file(
        &mut self,
        dir: &Path,
        name: &str,
        fingerprints: &mut FingerprintSet,
    ) -> Result<FileOutcome> {
        let path = dir.join(name);
        info!("Searching title for {}", path.display());

        let fingerprint = hash_file(&path)?;
        debug!("{name} fingerprint: {fingerprint}");
        if fingerprints.contains(&fingerprint) {
            return self.mark_duplicate(dir, name);
        }
        fingerprints.insert(fingerprint);

        let candidates = self.titles.candidates(&path)?;
        if candidates.is_empty() {
            info!("No usable title found for {name}, skipping");
            return Ok(FileOutcome::Skipped);
        }

        let title = if candidates.meta.is_empty() {
            candidates.mined
        } else if candidates.mined.is_empty() || candidates.meta == candidates.mined {
            candidates.meta
        } else {
            let choice = self.prompt.candidate_choice(&candidates.meta, &candidates.mined);
            if self.stopped() {
                return Ok(FileOutcome::Aborted);
            }
            match choice {
                CandidateChoice::UseMeta => candidates.meta,
                CandidateChoice::UseMined => candidates.mined,
                CandidateChoice::Abort => return Ok(FileOutcome::Aborted),
            }
        };
        debug!("{name}: chose title {title}");

        self.rename_and_archive(dir, name, &title)
    }

    /// Content already seen earlier in the run: mark in place, no extraction.
    fn mark_duplicate(&self, dir: &Path, name: &str) -> Result<FileOutcome> {
        let marked = format!("{}{}", self.config.dup_prefix, name);
        info!("Duplicate content, renaming {name} to {marked}");
        fs::rename(dir.join(name), dir.join(&marked))
            .with_context(|| format!("Failed to mark duplicate {name}"))?;
        Ok(FileOutcome::Duplicate)
    }

    fn rename_and_archive(&mut self, dir: &Path, current: &str, title: &str) -> Result<FileOutcome> {
        if current == title {
            info!("{current} already has this name, keeping it");
            return Ok(FileOutcome::NotRenamed);
        }

        if !self.bulk {
            let choice = self.prompt.file_choice(current, title);
            // an interrupt during the prompt discards the pending answer
            if self.stopped() {
                return Ok(FileOutcome::Aborted);
            }
            match choice {
                FileChoice::Confirm => {}
                FileChoice::ConfirmAll => self.bulk = true,
                FileChoice::Skip => {
                    info!("Keeping file name {current}");
                    return Ok(FileOutcome::NotRenamed);
                }
                FileChoice::Abort => return Ok(FileOutcome::Aborted),
            }
        }

        let src = dir.join(current);
        let dst = dir.join(title);
        if dst.exists() {
            warn!("Not renaming {current}: {title} already exists");
            return Ok(FileOutcome::NotRenamed);
        }
        if let Err(err) = fs::rename(&src, &dst) {
            warn!("Failed to rename {current} to {title}: {err}");
            return Ok(FileOutcome::NotRenamed);
        }
        info!("Renamed {current} to {title}");

        self.archive(dir, title);
        Ok(FileOutcome::Renamed)
    }

    /// Move a renamed file into the archive subfolder. Failures only warn:
    /// the rename itself is not rolled back.
    fn archive(&self, dir: &Path, name: &str) {
        let archive = dir.join(&self.config.archive_dir);
        let target = archive.join(name);
        if target.exists() {
            warn!("File {name} was not moved: {} already exists", target.display());
            return;
        }
        let moved = fs::create_dir_all(&archive).and_then(|_| fs::rename(dir.join(name), &target));
        if let Err(err) = moved {
            warn!("File {name} was not moved to {}: {err}", archive.display());
        }
    }
}

/// `.pdf` files directly under `dir`, sorted by name. Symlinks are followed,
/// so a link to a PDF counts. The extension check is case-sensitive.
fn list_pdfs(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.path().is_file() {
                return None;
            }
            let name = entry.file_name().to_str()?.to_string();
            name.ends_with(".pdf").then_some(name)
        })
        .collect();
    names.sort();
    Ok(names)
}

/// Absolute-ish owned path for log output in the binary.
pub fn display_target(target: &Path) -> PathBuf {
    fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf())
}
