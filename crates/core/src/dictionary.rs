//! Entity dictionary construction.
//!
//! An [`EntityDictionary`] maps entity names to their canonical values, and each
//! canonical value to the list of surface forms (the value itself plus its
//! synonyms) that should be recognised in training phrases. The dictionary is
//! built once from raw CSV rows and is read-only afterwards; every phrase
//! annotation in a run shares the same dictionary.

use convotrain_types::EntityName;

/// One canonical value and its recognisable surface forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueEntry {
    value: String,
    synonyms: Vec<String>,
}

impl ValueEntry {
    /// The canonical value, exactly as it appeared in the source row.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Surface forms for this value, sorted by descending length.
    ///
    /// The canonical value is always present in this list. The descending
    /// length order is what gives longest-match precedence during annotation,
    /// so callers must iterate in the stored order.
    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }
}

/// One entity type and its canonical values, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEntry {
    name: EntityName,
    values: Vec<ValueEntry>,
}

impl EntityEntry {
    /// The entity name, without any marker prefix.
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    /// Canonical values of this entity, in first-seen order.
    pub fn values(&self) -> &[ValueEntry] {
        &self.values
    }
}

/// Ordered mapping of entity name to canonical value to surface forms.
///
/// Iteration order is significant: entities and values are stored in the order
/// their first row appeared, and synonym lists are sorted by descending length
/// (ties keep their original relative order). Match precedence during
/// annotation follows exactly this ordering, so longest-match priority holds
/// within one canonical value's list but not globally across entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDictionary {
    entries: Vec<EntityEntry>,
}

impl EntityDictionary {
    /// Builds a dictionary from raw entity rows.
    ///
    /// Each row is expected as `(entity name, canonical value, synonyms...)`.
    /// For every row the canonical value is appended to its own synonym list,
    /// blank cells are dropped, parentheses are normalised to brackets, and
    /// the resulting list is sorted by descending length.
    ///
    /// Rows with fewer than two columns, or with a blank entity name or
    /// canonical value, are skipped with a warning rather than aborting the
    /// batch.
    ///
    /// When the same (entity, value) pair appears in more than one row, the
    /// synonym lists are concatenated, deduplicated keeping the first
    /// occurrence, and re-sorted.
    pub fn from_rows<R: AsRef<[String]>>(rows: &[R]) -> Self {
        let mut dictionary = Self::default();

        for (row_number, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let (Some(raw_name), Some(raw_value)) = (row.first(), row.get(1)) else {
                tracing::warn!(row = row_number, "skipping entity row with fewer than two columns");
                continue;
            };

            let name = match EntityName::new(raw_name) {
                Ok(name) => name,
                Err(_) => {
                    tracing::warn!(row = row_number, "skipping entity row with blank entity name");
                    continue;
                }
            };
            if raw_value.is_empty() {
                tracing::warn!(row = row_number, "skipping entity row with blank canonical value");
                continue;
            }

            let mut synonyms: Vec<String> = row[2..]
                .iter()
                .chain(std::iter::once(raw_value))
                .filter(|cell| !cell.is_empty())
                .map(|cell| normalise_synonym(cell))
                .collect();
            dedup_first_occurrence(&mut synonyms);
            sort_by_descending_length(&mut synonyms);

            dictionary.insert(name, raw_value.clone(), synonyms);
        }

        dictionary
    }

    /// Entities in first-seen order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityEntry> {
        self.entries.iter()
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&EntityEntry> {
        self.entries.iter().find(|e| e.name.as_str() == name)
    }

    /// Number of entity types in the dictionary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, name: EntityName, value: String, synonyms: Vec<String>) {
        let index = match self.entries.iter().position(|e| e.name == name) {
            Some(index) => index,
            None => {
                self.entries.push(EntityEntry {
                    name,
                    values: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        let entity = &mut self.entries[index];

        match entity.values.iter_mut().find(|v| v.value == value) {
            Some(existing) => {
                // Duplicate (entity, value) row: flatten-and-dedup merge.
                existing.synonyms.extend(synonyms);
                dedup_first_occurrence(&mut existing.synonyms);
                sort_by_descending_length(&mut existing.synonyms);
            }
            None => entity.values.push(ValueEntry { value, synonyms }),
        }
    }
}

/// Replaces parentheses with brackets.
///
/// The remote service treats parentheses as markup inside entity values, so
/// they are normalised at ingestion time.
fn normalise_synonym(raw: &str) -> String {
    raw.replace('(', "[").replace(')', "]")
}

/// Stable sort by descending byte length; equal-length entries keep their
/// original relative order.
fn sort_by_descending_length(synonyms: &mut [String]) {
    synonyms.sort_by(|a, b| b.len().cmp(&a.len()));
}

fn dedup_first_occurrence(synonyms: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(synonyms.len());
    synonyms.retain(|s| {
        if seen.iter().any(|kept: &String| kept == s) {
            false
        } else {
            seen.push(s.clone());
            true
        }
    });
}
