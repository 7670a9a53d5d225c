pub mod config;
pub mod content;
pub mod error;
pub mod gather;
pub mod lister;
pub mod report;
pub mod rules;
pub mod sorter;
pub mod tree;

pub use config::{IgnoreConfig, IgnoreExtensionsConfig};
pub use content::{ContentSerializer, FileBlock, FileBody, render_blocks, serialize_contents};
pub use error::{AppError, NodeAccessError, NodeOperation, Result};
pub use gather::{Entry, GatheredFiles, gather_files, list_children};
pub use lister::DirectoryLister;
pub use report::{Report, ReportWriter};
pub use rules::RuleSet;
pub use rules::defaults::default_rule_set;
pub use rules::matcher::IgnoreMatcher;
pub use sorter::Sorter;
pub use tree::{TreeLabel, TreeLine, TreeRenderer, max_depth, render_tree};
