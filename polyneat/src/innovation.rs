use crate::errors::LoadError;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::{Entry, HashMap};
use std::io::{BufRead, Write};
use std::io;

/// Identifier of a structural innovation (a new link, or one of the
/// two links created by a neuron split).
pub type InnovationId = u64;
/// Identifier of a neuron within the population's ID space.
pub type NeuronId = u64;

/// An `InnovationDatabase` keeps track of structural innovations in
/// a population, so that identical mutations performed by different
/// genomes within the same generation are assigned the same IDs and
/// stay aligned during crossover.
///
/// New link mutations are identified by their endpoint pair; neuron
/// splits by the ID of the split link. Issued IDs are strictly
/// increasing and are never reassigned, even after a [`flush`].
///
/// [`flush`]: InnovationDatabase::flush
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnovationDatabase {
    next_innovation: InnovationId,
    next_neuron_id: NeuronId,
    links: HashMap<(NeuronId, NeuronId), InnovationId, RandomState>,
    splits: HashMap<InnovationId, (NeuronId, InnovationId, InnovationId), RandomState>,
}

impl InnovationDatabase {
    /// Creates a database whose counters start at the passed values.
    ///
    /// # Examples
    /// ```
    /// use polyneat::InnovationDatabase;
    ///
    /// let mut db = InnovationDatabase::new(6, 4);
    ///
    /// assert_eq!(db.register_link(0, 3), 6);
    /// ```
    pub fn new(next_innovation: InnovationId, next_neuron_id: NeuronId) -> InnovationDatabase {
        InnovationDatabase {
            next_innovation,
            next_neuron_id,
            links: HashMap::default(),
            splits: HashMap::default(),
        }
    }

    /// Returns the innovation ID for a link between the passed
    /// neurons, allocating a fresh one if the pair has not been seen
    /// since the last [`flush`].
    ///
    /// # Examples
    /// ```
    /// use polyneat::InnovationDatabase;
    ///
    /// let mut db = InnovationDatabase::new(0, 2);
    ///
    /// let id = db.register_link(0, 1);
    /// // The same mutation in another genome shares the ID.
    /// assert_eq!(db.register_link(0, 1), id);
    /// assert_ne!(db.register_link(1, 0), id);
    /// ```
    ///
    /// [`flush`]: InnovationDatabase::flush
    pub fn register_link(&mut self, from: NeuronId, to: NeuronId) -> InnovationId {
        match self.links.entry((from, to)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.next_innovation;
                self.next_innovation += 1;
                *entry.insert(id)
            }
        }
    }

    /// Returns the `(new neuron, incoming link, outgoing link)` IDs
    /// for a split of the passed link. Registering the same split
    /// again before the next [`flush`] yields the same triple.
    ///
    /// `from` and `to` are the endpoints of the split link; they
    /// identify the two replacement links in the link registry.
    ///
    /// [`flush`]: InnovationDatabase::flush
    pub fn register_neuron_split(
        &mut self,
        link: InnovationId,
        from: NeuronId,
        to: NeuronId,
    ) -> (NeuronId, InnovationId, InnovationId) {
        if let Some(&record) = self.splits.get(&link) {
            return record;
        }
        let neuron = self.next_neuron_id;
        self.next_neuron_id += 1;
        let in_link = self.register_link(from, neuron);
        let out_link = self.register_link(neuron, to);
        let record = (neuron, in_link, out_link);
        self.splits.insert(link, record);
        record
    }

    /// Forgets the recorded mutations while keeping the ID counters,
    /// so equivalent mutations in later generations are treated as
    /// novel. IDs already embedded in genomes remain valid.
    pub fn flush(&mut self) {
        self.links.clear();
        self.splits.clear();
    }

    /// Next innovation ID that would be issued.
    pub fn next_innovation(&self) -> InnovationId {
        self.next_innovation
    }

    /// Next neuron ID that would be issued.
    pub fn next_neuron_id(&self) -> NeuronId {
        self.next_neuron_id
    }

    /// Writes the registry as a block of the population snapshot.
    /// Entries are sorted so the output is deterministic.
    pub fn save(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(
            writer,
            "InnovationDatabase: {} {}",
            self.next_innovation, self.next_neuron_id
        )?;
        let mut links: Vec<_> = self.links.iter().collect();
        links.sort_by_key(|(_, &id)| id);
        for (&(from, to), &id) in links {
            writeln!(writer, "Link: {} {} {}", from, to, id)?;
        }
        let mut splits: Vec<_> = self.splits.iter().collect();
        splits.sort_by_key(|(&link, _)| link);
        for (&link, &(neuron, in_link, out_link)) in splits {
            writeln!(
                writer,
                "Split: {} {} {} {}",
                link, neuron, in_link, out_link
            )?;
        }
        writeln!(writer, "InnovationDatabaseEnd")
    }

    /// Reads a registry block previously written by [`save`].
    ///
    /// [`save`]: InnovationDatabase::save
    pub fn load(reader: &mut dyn BufRead) -> Result<InnovationDatabase, LoadError> {
        let header = read_line(reader)?;
        let mut fields = header
            .strip_prefix("InnovationDatabase:")
            .ok_or_else(|| LoadError::Malformed(header.clone()))?
            .split_whitespace();
        let next_innovation = parse_field(&mut fields, &header)?;
        let next_neuron_id = parse_field(&mut fields, &header)?;
        let mut db = InnovationDatabase::new(next_innovation, next_neuron_id);

        loop {
            let line = read_line(reader)?;
            if line == "InnovationDatabaseEnd" {
                return Ok(db);
            } else if let Some(rest) = line.strip_prefix("Link:") {
                let mut fields = rest.split_whitespace();
                let from = parse_field(&mut fields, &line)?;
                let to = parse_field(&mut fields, &line)?;
                let id = parse_field(&mut fields, &line)?;
                db.links.insert((from, to), id);
            } else if let Some(rest) = line.strip_prefix("Split:") {
                let mut fields = rest.split_whitespace();
                let link = parse_field(&mut fields, &line)?;
                let neuron = parse_field(&mut fields, &line)?;
                let in_link = parse_field(&mut fields, &line)?;
                let out_link = parse_field(&mut fields, &line)?;
                db.splits.insert(link, (neuron, in_link, out_link));
            } else {
                return Err(LoadError::Malformed(line));
            }
        }
    }
}

/// Reads one line, trimming the trailing newline. An exhausted
/// reader is a malformed snapshot, not a clean EOF.
pub(crate) fn read_line(reader: &mut dyn BufRead) -> Result<String, LoadError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(LoadError::Malformed("unexpected end of file".into()));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub(crate) fn parse_field<T: std::str::FromStr>(
    fields: &mut std::str::SplitWhitespace<'_>,
    line: &str,
) -> Result<T, LoadError> {
    fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| LoadError::Malformed(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_links_share_an_id() {
        let mut db = InnovationDatabase::new(0, 5);
        let a = db.register_link(1, 4);
        let b = db.register_link(2, 4);
        assert_eq!(db.register_link(1, 4), a);
        assert_eq!(db.register_link(2, 4), b);
        assert_ne!(a, b);
    }

    #[test]
    fn split_is_idempotent_per_generation() {
        let mut db = InnovationDatabase::new(6, 4);
        let first = db.register_neuron_split(2, 0, 3);
        assert_eq!(db.register_neuron_split(2, 0, 3), first);

        let (neuron, in_link, out_link) = first;
        assert_eq!(neuron, 4);
        // The replacement links are ordinary link registrations.
        assert_eq!(db.register_link(0, neuron), in_link);
        assert_eq!(db.register_link(neuron, 3), out_link);
    }

    #[test]
    fn flush_forgets_pairs_but_never_reuses_ids() {
        let mut db = InnovationDatabase::new(0, 2);
        let before = db.register_link(0, 1);
        db.flush();
        let after = db.register_link(0, 1);
        assert!(after > before);
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut db = InnovationDatabase::new(10, 0);
        let ids: Vec<_> = (0..20).map(|i| db.register_link(i, i + 1)).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn save_load_save_is_byte_identical() {
        let mut db = InnovationDatabase::new(6, 4);
        db.register_link(0, 3);
        db.register_neuron_split(2, 1, 3);
        db.register_link(3, 1);

        let mut first = Vec::new();
        db.save(&mut first).unwrap();
        let reloaded = InnovationDatabase::load(&mut first.as_slice()).unwrap();
        let mut second = Vec::new();
        reloaded.save(&mut second).unwrap();
        assert_eq!(first, second);
        assert_eq!(reloaded.next_innovation(), db.next_innovation());
        assert_eq!(reloaded.next_neuron_id(), db.next_neuron_id());
    }
}
