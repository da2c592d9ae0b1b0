/*!
AS path extraction from decoded records.

A record contributes AS paths only when all of the following hold:
1. its type set contains the TABLE_DUMP_V2 code (`13`)
2. its subtype set contains one of the accepted RIB subtypes (`4` or `10` by default)
3. the path attribute's type set contains the AS_PATH code (`2`)
4. the segment's type set contains the AS_SEQUENCE code (`2`); AS_SET segments have no order
   and are never paths

Each matching segment yields its tokens, unmodified and in order, as one [AsPath]. Missing
fields are empty sets or lists, so a malformed record simply matches nothing.
*/
use crate::models::{AsPath, CodeSet, PathAttribute, PathSegment, Record, RibEntry};

pub const TABLE_DUMP_V2: u32 = 13;
pub const DEFAULT_RIB_SUBTYPES: [u32; 2] = [4, 10];
pub const AS_PATH_ATTRIBUTE: u32 = 2;
pub const AS_SEQUENCE_SEGMENT: u32 = 2;

/// Codes tested by the [AsPathExtractor] at each level of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub record_type: u32,
    /// A record matches if its subtype set shares at least one code with this set.
    pub rib_subtypes: CodeSet,
    pub attr_type: u32,
    pub segment_type: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            record_type: TABLE_DUMP_V2,
            rib_subtypes: CodeSet::of(&DEFAULT_RIB_SUBTYPES),
            attr_type: AS_PATH_ATTRIBUTE,
            segment_type: AS_SEQUENCE_SEGMENT,
        }
    }
}

impl ExtractorConfig {
    /// Replaces the accepted RIB subtypes. An empty list keeps the current set.
    pub fn with_rib_subtypes(mut self, subtypes: &[u32]) -> Self {
        if !subtypes.is_empty() {
            self.rib_subtypes = CodeSet::of(subtypes);
        }
        self
    }
}

/// Pure filter from records to the AS paths they carry.
#[derive(Debug, Clone, Default)]
pub struct AsPathExtractor {
    config: ExtractorConfig,
}

impl AsPathExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        AsPathExtractor { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn accepts_record(&self, record: &Record) -> bool {
        record.record_type.contains(self.config.record_type)
            && record.record_subtype.contains_any(&self.config.rib_subtypes)
    }

    pub fn accepts_attribute(&self, attribute: &PathAttribute) -> bool {
        attribute.attr_type.contains(self.config.attr_type)
    }

    pub fn accepts_segment(&self, segment: &PathSegment) -> bool {
        segment.segment_type.contains(self.config.segment_type)
    }

    /// Lazily yields the AS paths of a record without consuming it.
    pub fn extract<'a>(&'a self, record: &'a Record) -> impl Iterator<Item = AsPath> + 'a {
        let entries: &[RibEntry] = match self.accepts_record(record) {
            true => &record.rib_entries,
            false => &[],
        };
        entries
            .iter()
            .flat_map(|entry| entry.path_attributes.iter())
            .filter(move |attr| self.accepts_attribute(attr))
            .flat_map(|attr| attr.segments.iter())
            .filter(move |segment| self.accepts_segment(segment))
            .map(|segment| AsPath::new(segment.as_tokens.clone()))
    }

    /// Same as [AsPathExtractor::extract], taking ownership of the record to avoid copying tokens.
    pub fn record_paths(&self, record: Record) -> impl Iterator<Item = AsPath> + '_ {
        let entries = match self.accepts_record(&record) {
            true => record.rib_entries,
            false => vec![],
        };
        entries
            .into_iter()
            .flat_map(|entry| entry.path_attributes)
            .filter(move |attr| self.accepts_attribute(attr))
            .flat_map(|attr| attr.segments)
            .filter(move |segment| self.accepts_segment(segment))
            .map(|segment| AsPath::new(segment.as_tokens))
    }

    /// Flattens a record stream into its AS paths. Records are pulled only as paths are consumed.
    pub fn paths<'a, I>(&'a self, records: I) -> impl Iterator<Item = AsPath> + 'a
    where
        I: IntoIterator<Item = Record>,
        I::IntoIter: 'a,
    {
        records
            .into_iter()
            .flat_map(move |record| self.record_paths(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rib_record(record_type: &[u32], subtype: &[u32], attributes: Vec<PathAttribute>) -> Record {
        Record::new(
            CodeSet::of(record_type),
            CodeSet::of(subtype),
            vec![RibEntry::new(attributes)],
        )
    }

    fn as_path_attr(segments: Vec<PathSegment>) -> PathAttribute {
        PathAttribute::new(AS_PATH_ATTRIBUTE, segments)
    }

    fn collect(extractor: &AsPathExtractor, record: &Record) -> Vec<String> {
        extractor
            .extract(record)
            .map(|p| p.canonical_key())
            .collect()
    }

    #[test]
    fn test_single_path() {
        let extractor = AsPathExtractor::default();
        let record = rib_record(
            &[13],
            &[4],
            vec![as_path_attr(vec![PathSegment::new(2, &["100", "200", "300"])])],
        );
        let paths = extractor.extract(&record).collect::<Vec<_>>();
        assert_eq!(paths, vec![AsPath::from(&["100", "200", "300"][..])]);
    }

    #[test]
    fn test_record_filters() {
        let extractor = AsPathExtractor::default();
        let attrs = || vec![as_path_attr(vec![PathSegment::new(2, &["1", "2"])])];

        assert_eq!(collect(&extractor, &rib_record(&[13], &[10], attrs())), vec!["1,2"]);
        assert_eq!(collect(&extractor, &rib_record(&[12, 13], &[2, 4], attrs())), vec!["1,2"]);
        assert!(collect(&extractor, &rib_record(&[12], &[4], attrs())).is_empty());
        assert!(collect(&extractor, &rib_record(&[16], &[4], attrs())).is_empty());
        assert!(collect(&extractor, &rib_record(&[13], &[2], attrs())).is_empty());
        assert!(collect(&extractor, &rib_record(&[13], &[1], attrs())).is_empty());
        assert!(collect(&extractor, &rib_record(&[], &[], attrs())).is_empty());
    }

    #[test]
    fn test_attribute_and_segment_filters() {
        let extractor = AsPathExtractor::default();
        let record = rib_record(
            &[13],
            &[4],
            vec![
                PathAttribute::new(1, vec![PathSegment::new(2, &["9", "9"])]),
                as_path_attr(vec![
                    PathSegment::new(2, &["1", "2"]),
                    PathSegment::new(1, &["3", "4"]),
                    PathSegment::new(2, &["5"]),
                ]),
                PathAttribute::new(17, vec![PathSegment::new(2, &["7", "8"])]),
                PathAttribute::default(),
            ],
        );
        assert_eq!(collect(&extractor, &record), vec!["1,2", "5"]);
    }

    #[test]
    fn test_as_set_only_yields_nothing() {
        let extractor = AsPathExtractor::default();
        let record = rib_record(
            &[13],
            &[4],
            vec![as_path_attr(vec![PathSegment::new(1, &["100", "200"])])],
        );
        assert_eq!(extractor.extract(&record).count(), 0);
    }

    #[test]
    fn test_multiple_entries_keep_order() {
        let extractor = AsPathExtractor::default();
        let record = Record::new(
            CodeSet::of(&[13]),
            CodeSet::of(&[4]),
            vec![
                RibEntry::new(vec![as_path_attr(vec![PathSegment::new(2, &["1", "2"])])]),
                RibEntry::default(),
                RibEntry::new(vec![as_path_attr(vec![PathSegment::new(2, &["3", "1"])])]),
                RibEntry::new(vec![as_path_attr(vec![PathSegment::new(2, &["1", "2"])])]),
            ],
        );
        assert_eq!(collect(&extractor, &record), vec!["1,2", "3,1", "1,2"]);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let extractor = AsPathExtractor::default();
        let record = rib_record(
            &[13],
            &[4],
            vec![as_path_attr(vec![
                PathSegment::new(2, &["1", "2"]),
                PathSegment::new(2, &["2", "3"]),
            ])],
        );
        let snapshot = record.clone();
        let first = extractor.extract(&record).collect::<Vec<_>>();
        let second = extractor.extract(&record).collect::<Vec<_>>();
        let owned = extractor.record_paths(record.clone()).collect::<Vec<_>>();
        assert_eq!(first, second);
        assert_eq!(first, owned);
        assert_eq!(record, snapshot);
    }

    #[test]
    fn test_custom_subtypes() {
        let extractor = AsPathExtractor::new(ExtractorConfig::default().with_rib_subtypes(&[2]));
        let attrs = || vec![as_path_attr(vec![PathSegment::new(2, &["1", "2"])])];
        assert_eq!(collect(&extractor, &rib_record(&[13], &[2], attrs())), vec!["1,2"]);
        assert!(collect(&extractor, &rib_record(&[13], &[4], attrs())).is_empty());

        let unchanged = ExtractorConfig::default().with_rib_subtypes(&[]);
        assert_eq!(unchanged, ExtractorConfig::default());
    }

    #[test]
    fn test_paths_over_stream() {
        let extractor = AsPathExtractor::default();
        let records = vec![
            rib_record(&[13], &[4], vec![as_path_attr(vec![PathSegment::new(2, &["1"])])]),
            rib_record(&[16], &[4], vec![as_path_attr(vec![PathSegment::new(2, &["2"])])]),
            rib_record(&[13], &[10], vec![as_path_attr(vec![PathSegment::new(2, &["3"])])]),
        ];
        let keys = extractor
            .paths(records)
            .map(|p| p.canonical_key())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["1", "3"]);
    }
}
