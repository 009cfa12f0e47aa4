//! Shared utilities for CLI commands

use fg_gather::GatherRequest;
use fg_sql::Predicate;

use crate::cli::SelectionArgs;

/// Turn root-row selection flags into a gather request.
pub(crate) fn selection_request(selection: &SelectionArgs) -> GatherRequest {
    let mut request = GatherRequest::new(selection.table.as_str());
    if let Some(filter) = &selection.filter {
        request = request.filter(Predicate::raw(filter.as_str()));
    }
    if let Some(id) = selection.id {
        request = request.id(id);
    }
    if let Some(depth) = selection.depth {
        request = request.depth(depth);
    }
    request
}
