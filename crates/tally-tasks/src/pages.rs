//! Page templates for the task tracker.

use tally_core::templates::{
    card, empty_state, error_banner, html_escape, input, layout, submit_button, table, textarea,
};

use crate::BRAND;
use crate::models::{Task, TaskForm, TaskId};

// =============================================================================
// Task List
// =============================================================================

pub fn task_list_page(tasks: &[Task], flash: Option<&str>) -> String {
    let content = if tasks.is_empty() {
        empty_state(
            "clipboard-list",
            "No tasks yet",
            "Add your first task to get started.",
            Some(("Add task", "/add_task")),
        )
    } else {
        let rows: Vec<Vec<String>> = tasks.iter().map(task_row).collect();
        table(&["Title", "Description", "Deadline", "Status", ""], &rows)
    };

    let content = format!(
        r##"<div class="flex items-center justify-between mb-6">
            <h1 class="text-3xl font-bold text-gray-900">My tasks</h1>
            <a href="/add_task" class="inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">
                <i class="fas fa-plus"></i> Add task
            </a>
        </div>
        {list}"##,
        list = card(&format!("{} task(s)", tasks.len()), &content),
    );

    layout(&BRAND, "Tasks", true, flash, &content)
}

fn task_row(task: &Task) -> Vec<String> {
    let title_class = if task.completed { "line-through-muted" } else { "font-medium" };
    let status = if task.completed {
        r#"<span class="text-green-600"><i class="fas fa-check"></i> Done</span>"#
    } else {
        r#"<span class="text-gray-500">Open</span>"#
    };
    let actions = format!(
        r##"<a href="/edit_task/{id}" class="text-primary-600 hover:underline mr-4"><i class="fas fa-pen"></i> Edit</a>
            <a href="/delete_task/{id}" class="text-red-600 hover:underline" onclick="return confirm('Delete this task?')"><i class="fas fa-trash"></i> Delete</a>"##,
        id = task.id,
    );

    vec![
        format!(r#"<span class="{title_class}">{}</span>"#, html_escape(&task.title)),
        task.description.as_deref().map(html_escape).unwrap_or_default(),
        task.deadline.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        status.to_string(),
        actions,
    ]
}

// =============================================================================
// Add / Edit Form
// =============================================================================

/// Where the form posts and how it is labelled.
pub enum FormMode {
    Add,
    Edit(TaskId),
}

pub fn task_form_page(mode: &FormMode, form: &TaskForm, error: Option<&str>) -> String {
    let (title, action, button) = match mode {
        FormMode::Add => ("New task", "/add_task".to_string(), "Add task"),
        FormMode::Edit(id) => ("Edit task", format!("/edit_task/{id}"), "Save changes"),
    };
    let error_html = error.map(error_banner).unwrap_or_default();

    let body = format!(
        r##"{error_html}
        <form method="POST" action="{action}">
            {title_input}
            {description_input}
            {deadline_input}
            <div class="flex items-center gap-4">
                {submit}
                <a href="/" class="text-gray-500 hover:underline">Cancel</a>
            </div>
        </form>"##,
        title_input = input("title", "Title", "text", &form.title, true),
        description_input = textarea("description", "Description", &form.description),
        deadline_input = input("deadline", "Deadline", "date", &form.deadline, true),
        submit = submit_button(button),
    );

    let content = format!(r##"<div class="max-w-xl mx-auto">{}</div>"##, card(title, &body));
    layout(&BRAND, title, true, None, &content)
}
