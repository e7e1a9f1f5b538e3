// Email templates
//
// Every interpolated display string is HTML-escaped; titles and names come
// from user input.

use chrono::{DateTime, Utc};
use html_escape::encode_text;

/// Subject and HTML body of one email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

pub fn task_assigned(task_title: &str, assigned_by: &str) -> RenderedEmail {
    RenderedEmail {
        subject: "A new task has been assigned to you".to_string(),
        html: format!(
            "<h2>New task assignment</h2>\n\
             <p><strong>{}</strong> assigned you a new task.</p>\n\
             <p><strong>Task:</strong> {}</p>\n\
             <p>Please review the task and get started.</p>",
            encode_text(assigned_by),
            encode_text(task_title),
        ),
    }
}

pub fn task_due(task_title: &str, due_date: DateTime<Utc>) -> RenderedEmail {
    RenderedEmail {
        subject: "Task due date reminder".to_string(),
        html: format!(
            "<h2>Task due date reminder</h2>\n\
             <p><strong>Task:</strong> {}</p>\n\
             <p><strong>Due:</strong> {}</p>\n\
             <p>The due date is approaching. Please check on the task.</p>",
            encode_text(task_title),
            due_date.format("%Y-%m-%d"),
        ),
    }
}

pub fn comment_added(task_title: &str, comment_author: &str) -> RenderedEmail {
    RenderedEmail {
        subject: "New comment on your task".to_string(),
        html: format!(
            "<h2>New comment</h2>\n\
             <p><strong>{}</strong> left a comment.</p>\n\
             <p><strong>Task:</strong> {}</p>\n\
             <p>Open the task to read the comment.</p>",
            encode_text(comment_author),
            encode_text(task_title),
        ),
    }
}

pub fn project_invite(project_name: &str, invited_by: &str) -> RenderedEmail {
    RenderedEmail {
        subject: "Project invitation".to_string(),
        html: format!(
            "<h2>Project invitation</h2>\n\
             <p><strong>{}</strong> invited you to a project.</p>\n\
             <p><strong>Project:</strong> {}</p>\n\
             <p>Join the project to start collaborating.</p>",
            encode_text(invited_by),
            encode_text(project_name),
        ),
    }
}

pub fn task_completed(task_title: &str, completed_by: &str) -> RenderedEmail {
    RenderedEmail {
        subject: "Your task has been completed".to_string(),
        html: format!(
            "<h2>Task completed</h2>\n\
             <p><strong>{}</strong> completed a task you created.</p>\n\
             <p><strong>Task:</strong> {}</p>",
            encode_text(completed_by),
            encode_text(task_title),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_strings_are_escaped() {
        let email = task_assigned("<script>alert(1)</script>", "Bea & Co");
        assert!(email.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(email.html.contains("Bea &amp; Co"));
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn test_due_date_is_formatted() {
        let due = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let email = task_due("Quarterly report", due);
        assert_eq!(email.subject, "Task due date reminder");
        assert!(email.html.contains("2026-03-09"));
    }

    #[test]
    fn test_each_template_mentions_subject_entity() {
        assert!(comment_added("Fix login", "Bea").html.contains("Fix login"));
        assert!(project_invite("Apollo", "Bea").html.contains("Apollo"));
        assert!(task_completed("Fix login", "Sam").html.contains("Sam"));
    }
}
