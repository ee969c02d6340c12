use maud::{html, Markup, DOCTYPE};

use crate::data::Thread;

pub mod components;

fn universal(body: Markup, title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en-us" {
            head {
                title { "codenotes | " (title) }
                meta name="viewport" content="width=device-width, initial-scale=1.0";
            }
            body {
                (body)
            }
        }
    }
}

/// The whole widget: every code line with its thread and composer.
pub fn page(threads: &[Thread]) -> Markup {
    let body = html! {
        .application {
            @for thread in threads {
                (components::line(thread))
            }
        }
    };
    universal(body, "Code")
}

/// A validation failure the viewer has to acknowledge before going on.
///
/// OK leads back to the line the viewer was typing on, if there is one.
pub fn alert(message: &str, line: Option<usize>) -> Markup {
    let back = match line {
        Some(line) => format!("/?open={line}#line-{line}"),
        None => "/".to_owned(),
    };
    let body = html! {
        .alert role="alert" {
            p { (message) }
            a href=(back) { "OK" }
        }
    };
    universal(body, "Alert")
}

/// A request that could not be completed.
pub fn failure(message: &str) -> Markup {
    let body = html! {
        .failure {
            p { (message) }
            a href="/" { "Back to the code" }
        }
    };
    universal(body, "Error")
}
