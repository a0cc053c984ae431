use crate::model::Quiz;

/// Entry gate, evaluated once before a session is created. A quiz with
/// no linked course is open to everyone; a linked course must be fully
/// completed. The gate is never re-checked mid-session.
pub fn can_enter(quiz: &Quiz, course_completion_percent: Option<u32>) -> bool {
    if quiz.course_id.is_none() {
        return true;
    }
    course_completion_percent.is_some_and(|p| p >= 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(course_id: Option<&str>) -> Quiz {
        Quiz {
            id: "q1".into(),
            title: "gated".into(),
            questions: Vec::new(),
            time_limit_minutes: None,
            course_id: course_id.map(|c| c.to_string()),
            quiz_file: "quiz.yaml".into(),
            quiz_hash: "sha256:test".into(),
        }
    }

    #[test]
    fn ungated_quiz_always_admits() {
        assert!(can_enter(&quiz(None), None));
        assert!(can_enter(&quiz(None), Some(0)));
    }

    #[test]
    fn gated_quiz_needs_full_completion() {
        let q = quiz(Some("rust-101"));
        assert!(can_enter(&q, Some(100)));
        assert!(can_enter(&q, Some(150)));
        assert!(!can_enter(&q, Some(99)));
        assert!(!can_enter(&q, Some(0)));
        assert!(!can_enter(&q, None));
    }
}
