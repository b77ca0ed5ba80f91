use std::collections::BTreeMap;

use crate::record::Record;

/// Folds records from several passes into one record per sprite identifier.
pub struct Merger<R> {
    records: BTreeMap<u32, R>,
}

impl<R: Record> Merger<R> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Fields present in `record` overwrite what earlier records set.
    pub fn add(&mut self, record: R) {
        match self.records.get_mut(&record.id()) {
            Some(existing) => existing.merge_from(record),
            None => {
                self.records.insert(record.id(), record);
            }
        }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = R>) {
        for record in records {
            self.add(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-empty records in ascending identifier order.
    pub fn finish(self) -> Vec<R> {
        self.records
            .into_values()
            .filter(|r| !r.is_empty())
            .collect()
    }
}

impl<R: Record> Default for Merger<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MetadataRecord, VariantRecord};

    fn meta(id: u32) -> MetadataRecord {
        MetadataRecord::with_id(id)
    }

    #[test]
    fn output_is_sorted_by_id() {
        let mut merger = Merger::new();
        for id in [30, 2, 17] {
            merger.add(MetadataRecord {
                door: Some(true),
                ..meta(id)
            });
        }
        let ids: Vec<u32> = merger.finish().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 17, 30]);
    }

    #[test]
    fn passes_combine_into_one_record() {
        let mut merger = Merger::new();
        merger.add(MetadataRecord {
            door: Some(true),
            ..meta(9)
        });
        merger.add(MetadataRecord {
            layer: Some(100),
            ..meta(9)
        });
        let out = merger.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].door, Some(true));
        assert_eq!(out[0].layer, Some(100));
    }

    #[test]
    fn later_pass_wins() {
        let mut merger = Merger::new();
        merger.extend([
            MetadataRecord {
                yadd: Some(10),
                ..meta(4)
            },
            MetadataRecord {
                yadd: Some(20),
                ..meta(4)
            },
        ]);
        assert_eq!(merger.finish()[0].yadd, Some(20));
    }

    #[test]
    fn empty_records_are_dropped() {
        let mut merger = Merger::new();
        merger.add(meta(1));
        assert_eq!(merger.len(), 1);
        assert!(merger.finish().is_empty());

        let mut merger = Merger::new();
        merger.add(VariantRecord {
            comment: Some("only a note".to_string()),
            ..VariantRecord::with_id(2)
        });
        assert!(merger.finish().is_empty());
    }

    #[test]
    fn zero_is_kept() {
        let mut merger = Merger::new();
        let mut r = meta(8);
        r.set_cut_sprite(0);
        merger.add(r);
        assert_eq!(merger.finish()[0].cut_sprite, Some(0));
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn last_contribution_wins(values in prop::collection::vec((0u32..20, -50i64..50), 1..40)) {
                let mut merger = Merger::new();
                let mut expected = std::collections::BTreeMap::new();
                for &(id, mov) in &values {
                    merger.add(MetadataRecord { mov: Some(mov), ..meta(id) });
                    expected.insert(id, mov);
                }
                let out = merger.finish();
                prop_assert_eq!(out.len(), expected.len());
                for r in out {
                    prop_assert_eq!(r.mov, expected.get(&r.id).copied());
                }
            }
        }
    }
}
