//! HTML templates shared by both apps.
//!
//! Uses a simple `format!` template approach with Tailwind CSS from a CDN.

use axum::http::StatusCode;

/// Navigation entry shown in the top bar of a signed-in page.
#[derive(Debug, Clone, Copy)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
}

/// Per-app name and navigation.
#[derive(Debug, Clone, Copy)]
pub struct Brand {
    pub name: &'static str,
    pub icon: &'static str,
    pub nav: &'static [NavLink],
}

/// Base HTML layout wrapper.
pub fn layout(brand: &Brand, title: &str, signed_in: bool, flash: Option<&str>, content: &str) -> String {
    let nav_links: String = if signed_in {
        let mut links: String = brand
            .nav
            .iter()
            .map(|l| {
                format!(
                    r##"<a href="{href}" class="flex items-center gap-2 px-3 py-2 rounded-lg hover:bg-primary-700"><i class="fas fa-{icon}"></i>{label}</a>"##,
                    href = l.href,
                    icon = l.icon,
                    label = l.label,
                )
            })
            .collect();
        links.push_str(
            r##"<a href="/logout" class="flex items-center gap-2 px-3 py-2 rounded-lg hover:bg-primary-700"><i class="fas fa-sign-out-alt"></i>Log out</a>"##,
        );
        links
    } else {
        r##"<a href="/login" class="px-3 py-2 rounded-lg hover:bg-primary-700">Log in</a>
            <a href="/register" class="px-3 py-2 rounded-lg hover:bg-primary-700">Register</a>"##
            .to_string()
    };

    let flash_html = flash.map(flash_banner).unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {app}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {{
            theme: {{
                extend: {{
                    colors: {{
                        primary: {{
                            50: '#eef2ff',
                            100: '#e0e7ff',
                            500: '#6366f1',
                            600: '#4f46e5',
                            700: '#4338ca',
                            900: '#312e81',
                        }}
                    }}
                }}
            }}
        }}
    </script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <script defer src="/static/tally.js"></script>
    <link rel="stylesheet" href="/static/tally.css">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>
<body class="bg-gray-50 min-h-screen">
    <nav class="bg-primary-600 text-white px-4 py-3 shadow-lg">
        <div class="max-w-5xl mx-auto flex items-center justify-between">
            <a href="/" class="flex items-center gap-2 text-lg font-semibold">
                <i class="fas fa-{icon}"></i>{app}
            </a>
            <div class="flex items-center gap-2 text-sm">{nav_links}</div>
        </div>
    </nav>
    <main class="max-w-5xl mx-auto p-6">
        {flash_html}
        {content}
    </main>
</body>
</html>"##,
        title = html_escape(title),
        app = brand.name,
        icon = brand.icon,
    )
}

/// One-shot notice shown at the top of the page.
pub fn flash_banner(message: &str) -> String {
    format!(
        r##"<div class="mb-6 p-4 bg-primary-50 border border-primary-100 rounded-lg text-primary-900">
            <i class="fas fa-info-circle mr-2"></i>{message}
        </div>"##,
        message = html_escape(message),
    )
}

/// Inline error notice for forms.
pub fn error_banner(message: &str) -> String {
    format!(
        r##"<div class="mb-6 p-4 bg-red-50 border border-red-200 rounded-lg text-red-700">
            <i class="fas fa-exclamation-circle mr-2"></i>{message}
        </div>"##,
        message = html_escape(message),
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden mb-6">
            <div class="px-6 py-4 border-b border-gray-200">
                <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##
    )
}

/// Stats card component.
pub fn stats_card(title: &str, value: &str, icon: &str, color: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 mt-1">{value}</p>
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##
    )
}

/// Input field component. `value` is escaped.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, required: bool) -> String {
    let required = if required { " required" } else { "" };
    format!(
        r##"<div class="space-y-1 mb-4">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}"{required}
                   class="w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500">
        </div>"##,
        value = html_escape(value),
    )
}

/// Multi-line text field. `value` is escaped.
pub fn textarea(name: &str, label: &str, value: &str) -> String {
    format!(
        r##"<div class="space-y-1 mb-4">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <textarea name="{name}" id="{name}" rows="3"
                      class="w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500">{value}</textarea>
        </div>"##,
        value = html_escape(value),
    )
}

/// Select field component.
pub fn select(name: &str, label: &str, options: &[(&str, &str, bool)]) -> String {
    let options_html: String = options
        .iter()
        .map(|(value, text, selected)| {
            if *selected {
                format!(r#"<option value="{value}" selected>{text}</option>"#)
            } else {
                format!(r#"<option value="{value}">{text}</option>"#)
            }
        })
        .collect();

    format!(
        r##"<div class="space-y-1 mb-4">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <select name="{name}" id="{name}"
                    class="w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500">
                {options_html}
            </select>
        </div>"##
    )
}

/// Primary submit button.
pub fn submit_button(text: &str) -> String {
    format!(
        r##"<button type="submit" class="bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium transition-colors">{text}</button>"##
    )
}

/// Table component. Cells are inserted as-is; escape user data first.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let headers_html: String = headers
        .iter()
        .map(|h| format!(r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{h}</th>"#))
        .collect();

    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td class="px-6 py-4 text-sm text-gray-900">{cell}</td>"#))
                .collect();
            format!(r#"<tr class="hover:bg-gray-50">{cells}</tr>"#)
        })
        .collect();

    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str, action: Option<(&str, &str)>) -> String {
    let action_html = action.map_or(String::new(), |(text, href)| {
        format!(r##"<a href="{href}" class="mt-4 inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium transition-colors">
            <i class="fas fa-plus"></i> {text}
        </a>"##)
    });

    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-1 text-gray-500">{description}</p>
            {action_html}
        </div>"##
    )
}

/// Bare page for error responses; no navigation, since the app is unknown here.
pub fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{code}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 min-h-screen flex items-center justify-center">
    <div class="bg-white rounded-xl shadow-sm border border-gray-200 p-8 max-w-md text-center">
        <h1 class="text-3xl font-bold text-gray-900">{code}</h1>
        <p class="mt-4 text-gray-600">{message}</p>
        <a href="/" class="mt-6 inline-block text-indigo-600 hover:underline">Back to start</a>
    </div>
</body>
</html>"##,
        code = status,
        message = html_escape(message),
    )
}

/// Simple HTML escape function
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
