//! Row layouts of the two commit reports.

use crate::core::CommitRecord;
use crate::git::RepositoryLocation;

/// Columns of the refactor commit report.
pub const REFACTOR_HEADER: [&str; 9] = [
    "repository_name",
    "repository_url",
    "commit_id",
    "parent_commit_id",
    "commit_url",
    "commit_message",
    "commit_date",
    "commit_author",
    "changed_files",
];

/// Columns of the test-only commit report.
pub const TEST_ONLY_HEADER: [&str; 9] = [
    "repository_name",
    "repository_url",
    "commit_id",
    "parent_commit_id",
    "commit_url",
    "commit_date",
    "changed_files_count",
    "total_addition_lines",
    "total_deletions_lines",
];

/// Header line for a column list.
pub fn header_line(columns: &[&str]) -> String {
    columns.join(",")
}

/// Refactor report row. The message is always quoted; other fields are verbatim.
pub fn refactor_row(location: &RepositoryLocation, record: &CommitRecord) -> String {
    [
        location.name.clone(),
        location.url.clone(),
        record.id.clone(),
        record.parent_id.clone(),
        location.commit_url(&record.id),
        quote(&record.message),
        record.date(),
        record.author.clone(),
        bracket_list(&record.changes.changed_files),
    ]
    .join(",")
}

/// Test-only report row.
pub fn test_only_row(location: &RepositoryLocation, record: &CommitRecord) -> String {
    [
        location.name.clone(),
        location.url.clone(),
        record.id.clone(),
        record.parent_id.clone(),
        location.commit_url(&record.id),
        record.date(),
        record.changes.file_count().to_string(),
        record.changes.total_additions.to_string(),
        record.changes.total_deletions.to_string(),
    ]
    .join(",")
}

/// Wrap in double quotes, doubling inner quotes.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// `[a b c]`: paths joined by single spaces inside brackets.
///
/// Paths containing spaces make the result ambiguous; consumers rely on this layout.
pub fn bracket_list(paths: &[String]) -> String {
    format!("[{}]", paths.join(" "))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::core::ChangeSummary;

    fn location() -> RepositoryLocation {
        RepositoryLocation::resolve("acme/widgets", "https://github.com", Path::new("repos")).unwrap()
    }

    fn record(message: &str, files: &[&str]) -> CommitRecord {
        CommitRecord {
            id: "1111".to_string(),
            parent_id: "0000".to_string(),
            message: message.to_string(),
            author: "Alice".to_string(),
            timestamp: 0,
            changes: ChangeSummary {
                changed_files: files.iter().map(|f| f.to_string()).collect(),
                total_additions: 5,
                total_deletions: 2,
            },
        }
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            header_line(&REFACTOR_HEADER),
            "repository_name,repository_url,commit_id,parent_commit_id,commit_url,commit_message,commit_date,commit_author,changed_files"
        );
        assert_eq!(
            header_line(&TEST_ONLY_HEADER),
            "repository_name,repository_url,commit_id,parent_commit_id,commit_url,commit_date,changed_files_count,total_addition_lines,total_deletions_lines"
        );
    }

    #[test]
    fn test_refactor_row_layout() {
        let row = refactor_row(
            &location(),
            &record("Refactor \"tests\"", &["src/FooTest.java", "src/Foo.java"]),
        );
        assert_eq!(
            row,
            "acme/widgets,https://github.com/acme/widgets,1111,0000,\
             https://github.com/acme/widgets/commit/1111,\"Refactor \"\"tests\"\"\",\
             1970-01-01T00:00:00+00:00,Alice,[src/FooTest.java src/Foo.java]"
        );
    }

    #[test]
    fn test_message_quoted_without_comma() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_test_only_row_layout() {
        let row = test_only_row(&location(), &record("x", &["src/FooTest.java"]));
        assert_eq!(
            row,
            "acme/widgets,https://github.com/acme/widgets,1111,0000,\
             https://github.com/acme/widgets/commit/1111,1970-01-01T00:00:00+00:00,1,5,2"
        );
    }

    #[test]
    fn test_bracket_list_keeps_spaces_ambiguous() {
        let paths = vec!["a b.java".to_string(), "c.java".to_string()];
        assert_eq!(bracket_list(&paths), "[a b.java c.java]");
        assert_eq!(bracket_list(&[]), "[]");
    }
}
