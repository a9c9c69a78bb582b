//! The default page renderer: hand-assembled HTML documents.

use std::fmt::Write as _;

use crate::domain::ports::{
    AuthFormView, CommentView, Flash, FlashLevel, Page, PageChrome, PageRenderer, PostDetailView,
    PostFormView, PostSummaryView, RenderError, UserRowView,
};
use pagination::Paginated;

use super::escape;

/// Minimal HTML implementation of the `PageRenderer` port.
#[derive(Debug, Clone, Default)]
pub struct BasicPageRenderer;

impl BasicPageRenderer {
    /// Create the renderer.
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for BasicPageRenderer {
    fn render(&self, page: &Page) -> Result<String, RenderError> {
        let document = match page {
            Page::PostIndex { chrome, posts } => layout(chrome, "Blog", &post_index(posts)),
            Page::PostDetail {
                chrome,
                post,
                comments,
            } => layout(chrome, &post.title, &post_detail(chrome, post, comments)),
            Page::Register { chrome, form } => layout(chrome, "Register", &register_form(form)),
            Page::Login { chrome, form, next } => {
                layout(chrome, "Log In", &login_form(form, next.as_deref()))
            }
            Page::PostForm {
                chrome,
                form,
                edit_id,
            } => {
                let title = if edit_id.is_some() {
                    "Edit Post"
                } else {
                    "New Post"
                };
                layout(chrome, title, &post_form(form, edit_id.as_deref()))
            }
            Page::AdminUsers { chrome, users } => layout(chrome, "Users", &admin_users(users)),
            Page::About { chrome } => layout(
                chrome,
                "About",
                "<h1>About</h1><p>A small blog about whatever comes to mind.</p>",
            ),
            Page::Contact { chrome } => layout(
                chrome,
                "Contact",
                "<h1>Contact</h1><p>Drop a comment on any post to reach the authors.</p>",
            ),
            Page::NotFound { chrome } => layout(
                chrome,
                "Not Found",
                "<h1>Not Found</h1><p>That page does not exist.</p>",
            ),
        };
        Ok(document)
    }
}

fn layout(chrome: &PageChrome, title: &str, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 512);
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{}</title></head><body>",
        escape(title)
    );
    html.push_str(&nav(chrome));
    html.push_str(&flashes(&chrome.flashes));
    html.push_str("<main>");
    html.push_str(body);
    html.push_str("</main></body></html>");
    html
}

fn nav(chrome: &PageChrome) -> String {
    let mut html = String::from(
        "<nav><a href=\"/\">Home</a> <a href=\"/about\">About</a> \
         <a href=\"/contact\">Contact</a>",
    );
    match &chrome.current_user {
        Some(name) => {
            if chrome.elevated {
                html.push_str(" <a href=\"/admin\">Admin</a> <a href=\"/new-post\">New Post</a>");
            }
            let _ = write!(
                html,
                " <span>Signed in as {}</span> <a href=\"/logout\">Log Out</a>",
                escape(name)
            );
        }
        None => {
            html.push_str(" <a href=\"/login\">Log In</a> <a href=\"/register\">Register</a>");
        }
    }
    html.push_str("</nav>");
    html
}

fn flashes(flashes: &[Flash]) -> String {
    let mut html = String::new();
    for flash in flashes {
        let class = match flash.level {
            FlashLevel::Error => "flash-error",
            FlashLevel::Info => "flash-info",
        };
        let _ = write!(
            html,
            "<p class=\"{}\">{}</p>",
            class,
            escape(&flash.message)
        );
    }
    html
}

fn post_index(posts: &[PostSummaryView]) -> String {
    let mut html = String::from("<h1>All Posts</h1><ul class=\"posts\">");
    for post in posts {
        let _ = write!(
            html,
            "<li><a href=\"/post/{}\">{}</a><br><em>{}</em><br>\
             <small>by {} on {}</small></li>",
            escape(&post.id),
            escape(&post.title),
            escape(&post.subtitle),
            escape(&post.author),
            escape(&post.published_on)
        );
    }
    html.push_str("</ul>");
    html
}

fn post_detail(chrome: &PageChrome, post: &PostDetailView, comments: &[CommentView]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<article><h1>{}</h1><h2>{}</h2>\
         <img src=\"{}\" alt=\"\"><p><small>by {} on {}</small></p>\
         <div class=\"body\">{}</div></article>",
        escape(&post.title),
        escape(&post.subtitle),
        escape(&post.image_url),
        escape(&post.author),
        escape(&post.published_on),
        escape(&post.body)
    );
    if chrome.elevated {
        let _ = write!(
            html,
            "<p><a href=\"/edit-post/{id}\">Edit</a> \
             <a href=\"/delete/{id}\">Delete</a></p>",
            id = escape(&post.id)
        );
    }
    html.push_str("<section class=\"comments\"><h3>Comments</h3><ul>");
    for comment in comments {
        let _ = write!(
            html,
            "<li><strong>{}</strong>: {}</li>",
            escape(&comment.author),
            escape(&comment.body)
        );
    }
    html.push_str("</ul>");
    if chrome.current_user.is_some() {
        let _ = write!(
            html,
            "<form method=\"post\" action=\"/post/{}\">\
             <textarea name=\"body\" required></textarea>\
             <button type=\"submit\">Submit Comment</button></form>",
            escape(&post.id)
        );
    } else {
        html.push_str("<p><a href=\"/login\">Log in</a> to comment.</p>");
    }
    html.push_str("</section>");
    html
}

fn register_form(form: &AuthFormView) -> String {
    format!(
        "<h1>Register</h1><form method=\"post\" action=\"/register\">\
         <label>Name <input name=\"name\" value=\"{}\" required></label>\
         <label>Email <input name=\"email\" type=\"email\" value=\"{}\" required></label>\
         <label>Password <input name=\"password\" type=\"password\" required></label>\
         <button type=\"submit\">Sign Up</button></form>",
        escape(&form.name),
        escape(&form.email)
    )
}

fn login_form(form: &AuthFormView, next: Option<&str>) -> String {
    let action = match next {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_owned(),
    };
    format!(
        "<h1>Log In</h1><form method=\"post\" action=\"{}\">\
         <label>Email <input name=\"email\" type=\"email\" value=\"{}\" required></label>\
         <label>Password <input name=\"password\" type=\"password\" required></label>\
         <button type=\"submit\">Log In</button></form>",
        escape(&action),
        escape(&form.email)
    )
}

fn post_form(form: &PostFormView, edit_id: Option<&str>) -> String {
    let (heading, action) = match edit_id {
        Some(id) => ("Edit Post", format!("/edit-post/{}", escape(id))),
        None => ("New Post", "/new-post".to_owned()),
    };
    format!(
        "<h1>{heading}</h1><form method=\"post\" action=\"{action}\">\
         <label>Title <input name=\"title\" value=\"{}\" required></label>\
         <label>Subtitle <input name=\"subtitle\" value=\"{}\" required></label>\
         <label>Image URL <input name=\"image_url\" value=\"{}\" required></label>\
         <label>Body <textarea name=\"body\" required>{}</textarea></label>\
         <button type=\"submit\">Publish</button></form>",
        escape(&form.title),
        escape(&form.subtitle),
        escape(&form.image_url),
        escape(&form.body)
    )
}

fn admin_users(users: &Paginated<UserRowView>) -> String {
    let mut html = String::from(
        "<h1>Users</h1><table><tr><th>Name</th><th>Email</th><th>Role</th><th></th></tr>",
    );
    for user in &users.items {
        let toggle = if user.can_toggle {
            format!(
                "<form method=\"post\" action=\"/change_role?user_id={}\">\
                 <button type=\"submit\">Toggle Role</button></form>",
                escape(&user.id)
            )
        } else {
            String::new()
        };
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&user.name),
            escape(&user.email),
            escape(&user.role),
            toggle
        );
    }
    html.push_str("</table><p class=\"pager\">");
    if users.has_prev() {
        let _ = write!(html, "<a href=\"/admin?page={}\">Previous</a> ", users.page.get() - 1);
    }
    let _ = write!(html, "Page {} of {}", users.page.get(), users.total_pages());
    if users.has_next() {
        let _ = write!(html, " <a href=\"/admin?page={}\">Next</a>", users.page.get() + 1);
    }
    html.push_str("</p>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagination::PageNumber;

    fn chrome_signed_in(elevated: bool) -> PageChrome {
        PageChrome {
            flashes: vec![Flash::error("something went wrong")],
            current_user: Some("Ada".to_owned()),
            elevated,
        }
    }

    #[test]
    fn index_lists_posts_with_detail_links() {
        let page = Page::PostIndex {
            chrome: PageChrome::default(),
            posts: vec![PostSummaryView {
                id: "abc".to_owned(),
                title: "Hello".to_owned(),
                subtitle: "world".to_owned(),
                author: "Ada".to_owned(),
                published_on: "August 7, 2026".to_owned(),
            }],
        };
        let html = BasicPageRenderer::new().render(&page).expect("renders");
        assert!(html.contains("/post/abc"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn user_content_is_escaped() {
        let page = Page::PostIndex {
            chrome: PageChrome::default(),
            posts: vec![PostSummaryView {
                id: "abc".to_owned(),
                title: "<script>alert(1)</script>".to_owned(),
                subtitle: String::new(),
                author: String::new(),
                published_on: String::new(),
            }],
        };
        let html = BasicPageRenderer::new().render(&page).expect("renders");
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn flashes_appear_in_the_document() {
        let page = Page::About {
            chrome: chrome_signed_in(false),
        };
        let html = BasicPageRenderer::new().render(&page).expect("renders");
        assert!(html.contains("something went wrong"));
        assert!(html.contains("flash-error"));
    }

    #[test]
    fn comment_form_needs_a_signed_in_user() {
        let post = PostDetailView {
            id: "abc".to_owned(),
            title: "T".to_owned(),
            subtitle: "S".to_owned(),
            body: "B".to_owned(),
            image_url: "i.png".to_owned(),
            author: "Ada".to_owned(),
            published_on: "today".to_owned(),
        };
        let anonymous = Page::PostDetail {
            chrome: PageChrome::default(),
            post: post.clone(),
            comments: Vec::new(),
        };
        let signed_in = Page::PostDetail {
            chrome: chrome_signed_in(false),
            post,
            comments: Vec::new(),
        };
        let renderer = BasicPageRenderer::new();
        assert!(!renderer
            .render(&anonymous)
            .expect("renders")
            .contains("Submit Comment"));
        assert!(renderer
            .render(&signed_in)
            .expect("renders")
            .contains("Submit Comment"));
    }

    #[test]
    fn admin_table_offers_toggle_only_where_allowed() {
        let users = Paginated::new(
            vec![
                UserRowView {
                    id: "root".to_owned(),
                    email: "root@x.com".to_owned(),
                    name: "Root".to_owned(),
                    role: "RootUser".to_owned(),
                    can_toggle: false,
                },
                UserRowView {
                    id: "v".to_owned(),
                    email: "v@x.com".to_owned(),
                    name: "V".to_owned(),
                    role: "Visitor".to_owned(),
                    can_toggle: true,
                },
            ],
            PageNumber::FIRST,
            5,
            2,
        );
        let page = Page::AdminUsers {
            chrome: chrome_signed_in(true),
            users,
        };
        let html = BasicPageRenderer::new().render(&page).expect("renders");
        assert!(html.contains("/change_role?user_id=v"));
        assert!(!html.contains("/change_role?user_id=root"));
    }
}
