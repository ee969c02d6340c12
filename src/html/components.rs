use maud::{html, Markup};

use crate::data::{Comment, Tagged, Thread};

/// One line of code, its line number and its comment thread.
///
/// Only the open line shows its thread; the line number toggles it.
pub fn line(thread: &Thread) -> Markup {
    let toggle = if thread.open {
        "/".to_owned()
    } else {
        format!("/?open={0}#line-{0}", thread.line)
    };

    html! {
        .code-line id={ "line-" (thread.line) } {
            a.line-number.selected[thread.open] href=(toggle) { (thread.line) }
            .content {
                pre { code.code { (thread.code) } }
                .comments.hidden[!thread.open] {
                    (comments(thread))
                }
            }
        }
    }
}

/// The comments of a line followed by the composer.
pub fn comments(thread: &Thread) -> Markup {
    html! {
        @for comment in &thread.comments {
            (tagged(comment))
        }
        (new_comment(thread.line))
    }
}

fn tagged(comment: &Tagged) -> Markup {
    match comment {
        Tagged::Server(c) => server_comment(c),
        Tagged::Local(c) => local_comment(c),
    }
}

/// A comment stored on the server: it can be liked, unliked and deleted.
pub fn server_comment(comment: &Comment) -> Markup {
    let (label, kind) = if comment.liked() {
        ("Unlike", "danger")
    } else {
        ("Like", "accept")
    };

    html! {
        .comment id={ "comment-" (comment.id) } {
            p { (comment.text) }
            .comment__controls {
                form method="post" action={ "/like/" (comment.id) } {
                    button class=(kind) type="submit" { (label) }
                }
                form method="post" action={ "/remove/" (comment.id) } {
                    button type="submit" { "Delete" }
                }
                (created_at(&comment.created_at))
            }
        }
    }
}

/// A comment kept in the local store: it can only be deleted.
fn local_comment(comment: &Comment) -> Markup {
    html! {
        .comment.local id={ "comment-" (comment.id) } {
            p { (comment.text) }
            .comment__controls {
                form method="post" action={ "/local/remove/" (comment.id) } {
                    button type="submit" { "Delete" }
                }
                (created_at(&comment.created_at))
                span.chip { "Not sent" }
            }
        }
    }
}

fn created_at(date_time: &str) -> Markup {
    html! {
        p.chip.comment__created-at { (date_time) }
    }
}

/// The composer for a new comment on `line`.
///
/// "Save" keeps the comment locally, "Send" creates it on the server.
fn new_comment(line: usize) -> Markup {
    html! {
        form.comment id={ "comment-new-" (line) } method="post" action={ "/save/" (line) } {
            input.chip type="text" name="text" placeholder="New comment...";
            .comment__controls {
                button type="submit" formaction={ "/save/" (line) } { "Save" }
                button.accept type="submit" formaction={ "/send/" (line) } { "Send" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{comment, thread, threads};

    #[test]
    fn server_comment_appears_only_under_its_line() {
        let mut c = comment(5, 2, "hi");
        c.is_liked = Some(false);
        let server = vec![c];

        let threads = threads("a\nb\nc", &server, &[], None);
        let rendered: Vec<_> = threads.iter().map(|t| line(t).into_string()).collect();

        assert!(!rendered[0].contains(r#"id="comment-5""#));
        assert!(rendered[1].contains(r#"id="comment-5""#));
        assert!(!rendered[2].contains(r#"id="comment-5""#));

        assert!(rendered[1].contains(r#"action="/like/5""#));
        assert!(rendered[1].contains(">Like</button>"));
        assert!(!rendered[1].contains("Unlike"));
    }

    #[test]
    fn liked_comment_offers_unlike() {
        let mut c = comment(5, 1, "hi");
        c.is_liked = Some(true);
        let markup = server_comment(&c).into_string();
        assert!(markup.contains(r#"class="danger""#));
        assert!(markup.contains(">Unlike</button>"));
    }

    #[test]
    fn local_comment_can_only_be_deleted() {
        let local = vec![comment(-1, 1, "mine")];
        let markup = comments(&thread(1, "a", &[], &local, None)).into_string();
        assert!(markup.contains(r#"action="/local/remove/-1""#));
        assert!(!markup.contains("/like/-1"));
        assert!(!markup.contains(r#"action="/remove/-1""#));
    }

    #[test]
    fn every_line_has_a_composer() {
        let markup = line(&thread(7, "x", &[], &[], None)).into_string();
        assert!(markup.contains(r#"formaction="/save/7""#));
        assert!(markup.contains(r#"formaction="/send/7""#));
    }

    #[test]
    fn only_the_open_line_is_expanded() {
        let closed = line(&thread(1, "a", &[], &[], Some(2))).into_string();
        assert!(closed.contains(r#"class="comments hidden""#));
        assert!(closed.contains(r#"href="/?open=1#line-1""#));

        let open = line(&thread(2, "b", &[], &[], Some(2))).into_string();
        assert!(open.contains(r#"class="line-number selected""#));
        assert!(open.contains(r#"class="comments""#));
    }
}
