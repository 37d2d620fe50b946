#![allow(dead_code)]

/// Shared helpers for kshuffle integration tests
use anyhow::Result;
use assert_cmd::Command;
use kshuffle::shuffle::{EngineError, ShuffleEngine};
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub fn kshuffle_cmd() -> Command {
    Command::cargo_bin("kshuffle").expect("kshuffle binary should be built")
}

/// Create a test FASTA file with the given content
pub fn create_test_fasta(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// Create a single-line FASTA with n distinct records
pub fn create_simple_fasta(n: usize) -> String {
    let bases = ['A', 'C', 'G', 'T'];
    let mut content = String::new();
    for i in 0..n {
        content.push_str(&format!(">seq_{} Test sequence {}\n", i, i));
        let seq: String = (0..40 + i).map(|j| bases[(i * 7 + j * 3 + j / 5) % 4]).collect();
        content.push_str(&seq);
        content.push('\n');
    }
    content
}

/// Split FASTA text into (identifier, sequence) pairs
pub fn fasta_units(text: &str) -> Vec<(String, String)> {
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len() % 2, 0, "odd number of output lines:\n{}", text);
    lines
        .chunks(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect()
}

pub fn klet_counts(s: &[u8], k: usize) -> HashMap<Vec<u8>, usize> {
    let mut counts = HashMap::new();
    for w in s.windows(k) {
        *counts.entry(w.to_vec()).or_insert(0) += 1;
    }
    counts
}

pub fn sorted(s: &[u8]) -> Vec<u8> {
    let mut v = s.to_vec();
    v.sort_unstable();
    v
}

/// Engine double that answers draws from a fixed script and records every
/// call it receives.
pub struct ScriptedEngine {
    script: VecDeque<Vec<u8>>,
    primed: Option<usize>,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedEngine {
    pub fn new<S: AsRef<[u8]>>(script: &[S]) -> Self {
        Self {
            script: script.iter().map(|s| s.as_ref().to_vec()).collect(),
            primed: None,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ShuffleEngine for ScriptedEngine {
    fn set_random_source(&mut self, _rng: StdRng) {
        self.calls.borrow_mut().push("rng".to_string());
    }

    fn prime(&mut self, sequence: &[u8], k: usize) -> Result<(), EngineError> {
        self.calls
            .borrow_mut()
            .push(format!("prime {} k={}", String::from_utf8_lossy(sequence), k));
        self.primed = Some(sequence.len());
        Ok(())
    }

    fn draw(&mut self, out: &mut [u8]) -> Result<(), EngineError> {
        let expected = self.primed.ok_or(EngineError::NotPrimed)?;
        let next = self.script.pop_front().expect("script exhausted");
        assert_eq!(next.len(), expected, "scripted draw has the wrong length");
        out.copy_from_slice(&next);
        self.calls
            .borrow_mut()
            .push(format!("draw {}", String::from_utf8_lossy(&next)));
        Ok(())
    }

    fn reset(&mut self) {
        self.primed = None;
        self.calls.borrow_mut().push("reset".to_string());
    }
}
