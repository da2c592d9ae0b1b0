//! Binary MRT decoder backed by [bgpkit_parser].
//!
//! Every [MrtRecord] is mapped onto the code-set [Record] model:
//! - the record type and subtype become single-code sets taken from the MRT common header
//! - only `TABLE_DUMP_V2` RIB AFI messages carry RIB entries
//! - AS_PATH becomes an attribute with code [ATTR_AS_PATH]
//! - segments keep their RFC 4271 / RFC 5065 segment type codes
use crate::error::TopologyError;
use crate::models::{CodeSet, PathAttribute, PathSegment, Record, RibEntry};
use bgpkit_parser::models::{
    AsPath as MrtAsPath, AsPathSegment, MrtMessage, MrtRecord, RibEntry as MrtRibEntry,
    TableDumpV2Message,
};
use bgpkit_parser::BgpkitParser;
use log::debug;

pub const ATTR_AS_PATH: u32 = 2;

pub const SEGMENT_AS_SET: u32 = 1;
pub const SEGMENT_AS_SEQUENCE: u32 = 2;
pub const SEGMENT_CONFED_SEQUENCE: u32 = 3;
pub const SEGMENT_CONFED_SET: u32 = 4;

/// Opens an MRT file, local or remote, plain or compressed, and decodes its records lazily.
///
/// Records bgpkit-parser cannot decode are logged and skipped by the parser itself.
pub fn open_mrt(
    path: &str,
) -> Result<impl Iterator<Item = Result<Record, TopologyError>>, TopologyError> {
    let parser = BgpkitParser::new(path).map_err(|e| TopologyError::open_failed(path, e))?;
    debug!("reading MRT records from {}", path);
    Ok(parser
        .into_record_iter()
        .map(|record| Ok(record_from_mrt(record))))
}

pub fn record_from_mrt(record: MrtRecord) -> Record {
    let header = record.common_header;
    let rib_entries = match record.message {
        MrtMessage::TableDumpV2Message(TableDumpV2Message::RibAfi(entries)) => entries
            .rib_entries
            .iter()
            .map(rib_entry_from_mrt)
            .collect(),
        _ => vec![],
    };

    Record::new(
        CodeSet::of(&[header.entry_type as u32]),
        CodeSet::of(&[header.entry_subtype as u32]),
        rib_entries,
    )
}

fn rib_entry_from_mrt(entry: &MrtRibEntry) -> RibEntry {
    let path_attributes = entry
        .attributes
        .as_path()
        .map(|path| attribute_from_mrt(ATTR_AS_PATH, path))
        .into_iter()
        .collect();
    RibEntry::new(path_attributes)
}

fn attribute_from_mrt(attr_type: u32, path: &MrtAsPath) -> PathAttribute {
    PathAttribute::new(attr_type, path.segments.iter().map(segment_from_mrt).collect())
}

fn segment_from_mrt(segment: &AsPathSegment) -> PathSegment {
    let (segment_type, asns) = match segment {
        AsPathSegment::AsSet(v) => (SEGMENT_AS_SET, v.iter()),
        AsPathSegment::AsSequence(v) => (SEGMENT_AS_SEQUENCE, v.iter()),
        AsPathSegment::ConfedSequence(v) => (SEGMENT_CONFED_SEQUENCE, v.iter()),
        AsPathSegment::ConfedSet(v) => (SEGMENT_CONFED_SET, v.iter()),
    };
    PathSegment {
        segment_type: CodeSet::of(&[segment_type]),
        as_tokens: asns.map(|asn| asn.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgpkit_parser::models::{
        Afi, AttrFlags, Attribute, AttributeValue, Attributes, CommonHeader, EntryType,
        NetworkPrefix, RibAfiEntries, RibGenericEntries, Safi, TableDumpV2Type,
    };
    use std::str::FromStr;

    fn header(entry_subtype: u16) -> CommonHeader {
        CommonHeader {
            timestamp: 1638316800,
            microsecond_timestamp: None,
            entry_type: EntryType::TABLE_DUMP_V2,
            entry_subtype,
            length: 0,
        }
    }

    fn rib_entry(path: MrtAsPath) -> MrtRibEntry {
        MrtRibEntry {
            peer_index: 0,
            originated_time: 1638316800,
            attributes: Attributes::from(vec![Attribute {
                value: AttributeValue::AsPath {
                    path,
                    is_as4: false,
                },
                flag: AttrFlags::TRANSITIVE,
            }]),
        }
    }

    #[test]
    fn test_rib_afi_record() {
        let path = MrtAsPath::from_segments(vec![
            AsPathSegment::sequence([3333, 1103, 2914]),
            AsPathSegment::set([64512]),
        ]);
        let record = MrtRecord {
            common_header: header(4),
            message: MrtMessage::TableDumpV2Message(TableDumpV2Message::RibAfi(RibAfiEntries {
                rib_type: TableDumpV2Type::RibIpv6Unicast,
                sequence_number: 1,
                prefix: NetworkPrefix::from_str("2001:db8::/32").unwrap(),
                rib_entries: vec![
                    rib_entry(path),
                    MrtRibEntry {
                        peer_index: 1,
                        originated_time: 1638316800,
                        attributes: Attributes::default(),
                    },
                ],
            })),
        };

        let record = record_from_mrt(record);
        assert_eq!(record.record_type, CodeSet::of(&[13]));
        assert_eq!(record.record_subtype, CodeSet::of(&[4]));
        assert_eq!(record.rib_entries.len(), 2);
        assert_eq!(
            record.rib_entries[0].path_attributes,
            vec![PathAttribute::new(
                ATTR_AS_PATH,
                vec![
                    PathSegment::new(SEGMENT_AS_SEQUENCE, &["3333", "1103", "2914"]),
                    PathSegment::new(SEGMENT_AS_SET, &["64512"]),
                ]
            )]
        );
        assert!(record.rib_entries[1].path_attributes.is_empty());
    }

    #[test]
    fn test_other_messages_carry_no_entries() {
        let record = MrtRecord {
            common_header: header(6),
            message: MrtMessage::TableDumpV2Message(TableDumpV2Message::RibGeneric(
                RibGenericEntries {
                    sequence_number: 1,
                    afi: Afi::Ipv4,
                    safi: Safi::Unicast,
                    nlri: NetworkPrefix::from_str("10.0.0.0/24").unwrap(),
                    rib_entries: vec![rib_entry(MrtAsPath::from_segments(vec![
                        AsPathSegment::sequence([64496, 64497]),
                    ]))],
                },
            )),
        };

        let record = record_from_mrt(record);
        assert_eq!(record.record_type, CodeSet::of(&[13]));
        assert_eq!(record.record_subtype, CodeSet::of(&[6]));
        assert!(record.rib_entries.is_empty());
    }

    #[test]
    fn test_segment_mapping() {
        let path = MrtAsPath::from_segments(vec![
            AsPathSegment::sequence([64496, 64497]),
            AsPathSegment::set([64498, 64499]),
        ]);
        let attr = attribute_from_mrt(ATTR_AS_PATH, &path);
        assert_eq!(attr.attr_type, CodeSet::of(&[2]));
        assert_eq!(
            attr.segments,
            vec![
                PathSegment::new(SEGMENT_AS_SEQUENCE, &["64496", "64497"]),
                PathSegment::new(SEGMENT_AS_SET, &["64498", "64499"]),
            ]
        );
    }
}
