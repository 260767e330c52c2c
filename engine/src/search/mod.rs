//! Search, filtering, aggregation and taxonomy over the merged record set.

mod search_for_results;
pub use search_for_results::search_for_results;

mod search_facets;
pub use search_facets::collect_facet_buckets;

mod search_filters;
pub use search_filters::{CompiledFilters, compile_filters};

mod range_facet;
pub use range_facet::{clamp_to_step, present_bounds};

mod taxonomy_tree;
pub use taxonomy_tree::{SelectionChange, TaxonomyNode, TaxonomyTree, selection_matches};

mod highlight;
pub use highlight::highlight_matches;
