/*!
aspath-topology extracts AS-level topology from BGP routing-table dumps.

Three passes share one deduplication discipline (first occurrence wins, optional output cap,
input is no longer read once the cap is reached):
- **paths**: AS_SEQUENCE paths of `TABLE_DUMP_V2` RIB entries, printed as comma-joined lines
- **nodes**: distinct ASes found in path lines
- **links**: distinct directed AS adjacencies found in path lines

The node and link passes read the line output of the path pass, so every stage can run on its
own:

```text
aspath-topology paths rib.20211201.0000.bz2 > paths.txt
aspath-topology nodes < paths.txt
aspath-topology links < paths.txt
```

# Library usage

Decoders yield `Result<Record, TopologyError>`; [itertools::process_results] runs a pass over the
records and hands back the first decode error, if any.

```no_run
use aspath_topology::{dedup_paths, open_records, AsPathExtractor, DumpFormat, Limit, SeenSet};
use itertools::process_results;

let records = open_records("rib.20211201.0000.bz2", DumpFormat::Auto).unwrap();
let extractor = AsPathExtractor::default();
process_results(records, |records| {
    for line in dedup_paths(extractor.paths(records), SeenSet::new(), Limit::AtMost(10)) {
        println!("{}", line);
    }
})
.unwrap();
```
*/

pub mod dedup;
pub mod decoder;
pub mod error;
pub mod export;
pub mod extractor;
pub mod io;
pub mod models;
pub mod topology;

pub use dedup::{Dedup, DedupExt, DedupState, Limit, SeenSet};
pub use decoder::{open_records, DumpFormat, RecordStream};
pub use error::TopologyError;
pub use export::export_records;
pub use extractor::{AsPathExtractor, ExtractorConfig};
pub use models::*;
pub use topology::{dedup_paths, extract_links, extract_nodes, line_links, line_tokens};
