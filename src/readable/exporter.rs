use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use super::ReadableEntry;
use crate::player::Player;
use crate::shogi::RulesEngine;

/// Writes the selected line of a player's record as a KIF-style listing
pub struct KifuExporter {
    include_forks: bool,
    include_comments: bool,
    max_plies: Option<usize>,
}

impl KifuExporter {
    pub fn new() -> Self {
        KifuExporter {
            include_forks: false,
            include_comments: false,
            max_plies: None,
        }
    }

    pub fn with_forks(mut self, include: bool) -> Self {
        self.include_forks = include;
        self
    }

    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    pub fn with_max_plies(mut self, max: usize) -> Self {
        self.max_plies = Some(max);
        self
    }

    /// Export to a file, returning the number of plies written
    pub fn export<E: RulesEngine>(&self, player: &Player<E>, output_path: &Path) -> io::Result<usize> {
        let file = File::create(output_path)?;
        let mut writer = BufWriter::new(file);
        let written = self.write_to(player, &mut writer)?;
        writer.flush()?;
        info!("exported {} plies to {}", written, output_path.display());
        Ok(written)
    }

    pub fn write_to<E: RulesEngine, W: Write>(&self, player: &Player<E>, writer: &mut W) -> io::Result<usize> {
        let entries = player
            .get_readable_kifu_state()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        for (key, value) in &player.kifu().header {
            writeln!(writer, "{}：{}", key, value)?;
        }
        writeln!(writer, "手数----指手----")?;

        let last = self.max_plies.map_or(entries.len(), |max| (max + 1).min(entries.len()));
        for (ply, entry) in entries.iter().take(last).enumerate() {
            self.write_entry(writer, ply, entry)?;
        }
        Ok(last.saturating_sub(1))
    }

    fn write_entry<W: Write>(&self, writer: &mut W, ply: usize, entry: &ReadableEntry) -> io::Result<()> {
        if ply > 0 {
            writeln!(writer, "{:>4} {}", ply, entry.kifu)?;
        }
        if self.include_comments {
            for comment in &entry.comments {
                writeln!(writer, "*{}", comment)?;
            }
        }
        if self.include_forks && !entry.forks.is_empty() {
            writeln!(writer, "     変化：{}", entry.forks.join("、"))?;
        }
        Ok(())
    }
}

impl Default for KifuExporter {
    fn default() -> Self {
        Self::new()
    }
}
