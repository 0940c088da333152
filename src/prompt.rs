//! User confirmation prompts.
//!
//! Every prompt returns a validated enum; re-asking on bad input stays inside
//! the terminal implementation. EOF on stdin and an interrupt while waiting
//! for an answer are both treated as abort.

use std::io::{self, Write};

use crate::interrupt;

/// How to run a whole directory pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    BulkAll,
    OneByOne,
    Abort,
}

/// Answer to "rename this file?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileChoice {
    Confirm,
    Skip,
    /// Confirm this file and every following one without asking again.
    ConfirmAll,
    Abort,
}

/// Answer to "which of the two title candidates?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateChoice {
    UseMeta,
    UseMined,
    Abort,
}

pub trait Confirmation {
    fn run_mode(&mut self) -> RunMode;
    fn file_choice(&mut self, current: &str, proposed: &str) -> FileChoice;
    fn candidate_choice(&mut self, meta: &str, mined: &str) -> CandidateChoice;
}

/// Interactive prompts on stdin/stdout.
pub struct TerminalPrompt;

impl Confirmation for TerminalPrompt {
    fn run_mode(&mut self) -> RunMode {
        loop {
            let Some(answer) = ask("Rename all files without asking (a [all] / o [one by one] / q [quit])? ")
            else {
                return RunMode::Abort;
            };
            match answer.trim() {
                "a" => return RunMode::BulkAll,
                "o" => return RunMode::OneByOne,
                "q" => return RunMode::Abort,
                _ => println!("Answer not valid! Choose a, o or q."),
            }
        }
    }

    fn file_choice(&mut self, current: &str, proposed: &str) -> FileChoice {
        println!("Current name: {current}");
        println!("New name:     {proposed}");
        loop {
            let Some(answer) = ask("Do you agree (y [yes] / n [no] / a [all] / q [quit])? ") else {
                return FileChoice::Abort;
            };
            match answer.trim() {
                "y" => return FileChoice::Confirm,
                "n" => return FileChoice::Skip,
                "a" => return FileChoice::ConfirmAll,
                "q" => return FileChoice::Abort,
                _ => println!("Answer not valid! Choose y, n, a or q."),
            }
        }
    }

    fn candidate_choice(&mut self, meta: &str, mined: &str) -> CandidateChoice {
        println!("** Found two candidates for title **");
        println!("[1] - [meta title]  : {meta}");
        println!("[2] - [mined title] : {mined}");
        loop {
            let Some(answer) = ask("Choose [1], [2] or q [quit]: ") else {
                return CandidateChoice::Abort;
            };
            match answer.trim() {
                "1" => return CandidateChoice::UseMeta,
                "2" => return CandidateChoice::UseMined,
                "q" => return CandidateChoice::Abort,
                _ => println!("Answer not valid! Choose 1, 2 or q."),
            }
        }
    }
}

/// One line from stdin, `None` on EOF, interrupt, or read failure.
fn ask(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    read_answer()
}

/// Byte-wise `read` on fd 0. Buffered stdin swallows EINTR and restarts the
/// wait, which would keep a Ctrl+C pending until the user answers; the raw
/// read returns right away so the interrupt flag can abort the prompt.
fn read_answer() -> Option<String> {
    let mut answer = Vec::new();
    let mut byte = 0u8;
    loop {
        if interrupt::interrupted() {
            return None;
        }
        let n = unsafe { libc::read(0, (&mut byte as *mut u8).cast(), 1) };
        match n {
            1 => {
                if byte == b'\n' {
                    break;
                }
                answer.push(byte);
            }
            0 => {
                // EOF
                if answer.is_empty() {
                    return None;
                }
                break;
            }
            _ => {
                let err = io::Error::last_os_error();
                if err.kind() != io::ErrorKind::Interrupted {
                    return None;
                }
            }
        }
    }
    Some(String::from_utf8_lossy(&answer).into_owned())
}
