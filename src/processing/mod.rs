//! Analyses over a loaded status [`crate::types::DataSet`].
//!
//! Every analysis is a read-only pass (or classify-then-group pass) over the dataset and
//! returns a result table from [`crate::table`]; nothing is written back to the dataset, so
//! running an analysis twice gives the same result.
//!
//! - [`classify`]: original / repost / reply classification
//! - [`group`]: per-group status type counts (by author, field or time bucket)
//! - [`count`]: single-field frequency counts with `others` refinement, reply targets
//! - [`entities`]: hashtag/mention counts from the entities document
//! - [`interactions`]: mentioned users per author
//!
//! ## Example
//!
//! ```rust
//! use status_analytics::config::StatusColumns;
//! use status_analytics::ingestion::{csv::ingest_csv_from_reader, status_schema};
//! use status_analytics::processing::{analyse_types, StatusType};
//! use status_analytics::table::GroupKey;
//!
//! let input = "\
//! id_str,from_user_id_str,text,in_reply_to_status_id_str
//! 1,u1,hello,
//! 2,u1,RT cool,
//! 3,u1,thanks,1
//! ";
//! let schema = status_schema(&["id_str", "from_user_id_str", "text", "in_reply_to_status_id_str"]);
//! let mut rdr = csv::Reader::from_reader(input.as_bytes());
//! let ds = ingest_csv_from_reader(&mut rdr, &schema).unwrap();
//!
//! let table = analyse_types(&ds, &StatusColumns::default()).unwrap();
//! let u1 = GroupKey::from("u1");
//! assert_eq!(table.get(&u1, StatusType::Original), Some(1));
//! assert_eq!(table.get(&u1, StatusType::Repost), Some(1));
//! assert_eq!(table.get(&u1, StatusType::Reply), Some(1));
//! ```

pub mod classify;
pub mod count;
pub mod entities;
pub mod group;
pub mod interactions;

pub use classify::{classify, Classifier, StatusType};
pub use count::{analyse_field, analyse_replies, count_field};
pub use entities::analyse_entities;
pub use group::{
    analyse_relations, analyse_reposts, analyse_types, analyse_types_by, group_count,
    group_count_by, GroupBy,
};
pub use interactions::{analyse_interactions, Interactions};
