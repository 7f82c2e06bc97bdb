use crate::models::StudentRecord;
use crate::utils::contains_ignore_case;

/// Narrow `students` to those whose name or school contains `query`,
/// ignoring case. Order is preserved; an empty query keeps everything.
pub fn filter_students<'a>(students: &'a [StudentRecord], query: &str) -> Vec<&'a StudentRecord> {
    let query = query.to_lowercase();
    students
        .iter()
        .filter(|s| student_matches_search(s, &query))
        .collect()
}

/// Query should already be lowercased.
fn student_matches_search(student: &StudentRecord, query: &str) -> bool {
    contains_ignore_case(&student.full_name, query)
        || contains_ignore_case(&student.school_category, query)
}
