//! Post and comment handlers: the public reading surface plus the gated
//! mutation routes.
//!
//! Post creation, editing, and deletion require an elevated role; comment
//! submission requires any signed-in user. Each handler invokes its guard
//! explicitly before touching a repository.

use std::collections::HashMap;

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::domain::access::{login_redirect, require_authenticated, require_elevated};
use crate::domain::ports::{
    CommentView, Flash, Page, PostDetailView, PostFormView, PostSummaryView,
};
use crate::domain::{Comment, CommentBody, Post, PostDraft, PostId, User, UserId};

use super::forms::{CommentForm, PostForm};
use super::{
    chrome_for, current_user, flash_and_redirect, map_comment_error, map_post_error, redirect_to,
    render_not_found, render_page, HttpState, PageResult, SessionContext,
};

/// `GET /`: all posts, newest first.
#[get("/")]
pub async fn post_index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let posts = state.posts.list_all().await.map_err(map_post_error)?;
    let authors = display_names(&state, posts.iter().map(Post::author_id)).await?;

    let views = posts
        .iter()
        .map(|post| PostSummaryView {
            id: post.id().to_string(),
            title: post.title().as_ref().to_owned(),
            subtitle: post.subtitle().to_owned(),
            author: author_name(&authors, post.author_id()),
            published_on: post.published_on().to_owned(),
        })
        .collect();

    let page = Page::PostIndex {
        chrome: chrome_for(&session, user.as_ref())?,
        posts: views,
    };
    render_page(&state, &page)
}

/// `GET /post/{id}`: one post with its comments.
#[get("/post/{id}")]
pub async fn show_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let chrome = chrome_for(&session, user.as_ref())?;

    let Some((post, comments)) = load_post_page(&state, &path).await? else {
        return render_not_found(&state, chrome);
    };

    let mut ids: Vec<UserId> = comments.iter().map(Comment::commentator_id).collect();
    ids.push(post.author_id());
    let names = display_names(&state, ids.into_iter()).await?;

    let page = Page::PostDetail {
        chrome,
        post: PostDetailView {
            id: post.id().to_string(),
            title: post.title().as_ref().to_owned(),
            subtitle: post.subtitle().to_owned(),
            body: post.body().to_owned(),
            image_url: post.image_url().to_owned(),
            author: author_name(&names, post.author_id()),
            published_on: post.published_on().to_owned(),
        },
        comments: comments
            .iter()
            .map(|comment| CommentView {
                author: author_name(&names, comment.commentator_id()),
                body: comment.body().as_ref().to_owned(),
            })
            .collect(),
    };
    render_page(&state, &page)
}

/// `POST /post/{id}`: submit a comment; signed-in users only.
#[post("/post/{id}")]
pub async fn submit_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> PageResult<HttpResponse> {
    let post_path = format!("/post/{}", path.as_str());
    let user = current_user(&state, &session).await?;

    let Ok(user) = require_authenticated(user.as_ref(), &post_path) else {
        session.push_flash(Flash::error("You need to log in or register to comment"))?;
        return Ok(redirect_to(&login_redirect(&post_path)));
    };

    let Ok(post_id) = PostId::parse(&path) else {
        return render_not_found(&state, chrome_for(&session, Some(user))?);
    };
    let Some(_post) = state
        .posts
        .find_by_id(post_id)
        .await
        .map_err(map_post_error)?
    else {
        return render_not_found(&state, chrome_for(&session, Some(user))?);
    };

    let body = match CommentBody::new(&form.body) {
        Ok(body) => body,
        Err(err) => {
            session.push_flash(Flash::error(err.to_string()))?;
            return Ok(redirect_to(&post_path));
        }
    };

    let comment = Comment::submitted(body, user.id(), post_id, Utc::now());
    state
        .comments
        .insert(&comment)
        .await
        .map_err(map_comment_error)?;
    Ok(redirect_to(&post_path))
}

/// `GET /new-post`: the empty post form; elevated only.
#[get("/new-post")]
pub async fn new_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let user = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    let page = Page::PostForm {
        chrome: chrome_for(&session, Some(user))?,
        form: PostFormView::default(),
        edit_id: None,
    };
    render_page(&state, &page)
}

/// `POST /new-post`: publish a post authored by the session user.
#[post("/new-post")]
pub async fn new_post_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<PostForm>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let user = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    match validated_draft(&state, &session, user, &form, None)? {
        DraftOutcome::Valid(draft) => {
            let post = Post::publish(draft, user.id(), Utc::now());
            match state.posts.insert(&post).await {
                Ok(()) => Ok(redirect_to("/")),
                Err(err) => duplicate_title_or_fail(&state, &session, user, &form, None, err),
            }
        }
        DraftOutcome::Rerendered(response) => Ok(response),
    }
}

/// `GET /edit-post/{id}`: the pre-filled post form; elevated only.
#[get("/edit-post/{id}")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let user = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    let Some(post) = find_post(&state, &path).await? else {
        return render_not_found(&state, chrome_for(&session, Some(user))?);
    };

    let page = Page::PostForm {
        chrome: chrome_for(&session, Some(user))?,
        form: PostFormView {
            title: post.title().as_ref().to_owned(),
            subtitle: post.subtitle().to_owned(),
            body: post.body().to_owned(),
            image_url: post.image_url().to_owned(),
        },
        edit_id: Some(post.id().to_string()),
    };
    render_page(&state, &page)
}

/// `POST /edit-post/{id}`: apply the edit, reassigning authorship to the
/// editor.
#[post("/edit-post/{id}")]
pub async fn edit_post_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<PostForm>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let user = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    let Some(post) = find_post(&state, &path).await? else {
        return render_not_found(&state, chrome_for(&session, Some(user))?);
    };
    let edit_id = post.id().to_string();

    match validated_draft(&state, &session, user, &form, Some(&edit_id))? {
        DraftOutcome::Valid(draft) => {
            let edited = post.edited(draft, user.id());
            let target = format!("/post/{}", edited.id());
            match state.posts.update(&edited).await {
                Ok(()) => Ok(redirect_to(&target)),
                Err(err) => {
                    duplicate_title_or_fail(&state, &session, user, &form, Some(&edit_id), err)
                }
            }
        }
        DraftOutcome::Rerendered(response) => Ok(response),
    }
}

/// `GET /delete/{id}`: delete a post and its comments; elevated only.
#[get("/delete/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> PageResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let user = match require_elevated(user.as_ref()) {
        Ok(user) => user,
        Err(err) => return flash_and_redirect(&session, &err),
    };

    let Ok(post_id) = PostId::parse(&path) else {
        return render_not_found(&state, chrome_for(&session, Some(user))?);
    };
    match state.posts.delete_with_comments(post_id).await {
        Ok(()) => Ok(redirect_to("/")),
        Err(crate::domain::ports::PostPersistenceError::NotFound) => {
            render_not_found(&state, chrome_for(&session, Some(user))?)
        }
        Err(err) => Err(map_post_error(err).into()),
    }
}

enum DraftOutcome {
    Valid(PostDraft),
    Rerendered(HttpResponse),
}

/// Validate the post form, re-rendering it with an error flash on failure.
fn validated_draft(
    state: &HttpState,
    session: &SessionContext,
    user: &User,
    form: &PostForm,
    edit_id: Option<&str>,
) -> PageResult<DraftOutcome> {
    match PostDraft::new(&form.title, &form.subtitle, &form.body, &form.image_url) {
        Ok(draft) => Ok(DraftOutcome::Valid(draft)),
        Err(err) => {
            let response =
                rerender_post_form(state, session, user, form, edit_id, &err.to_string())?;
            Ok(DraftOutcome::Rerendered(response))
        }
    }
}

/// Re-render the post form after a duplicate-title rejection, or propagate
/// any other persistence failure.
fn duplicate_title_or_fail(
    state: &HttpState,
    session: &SessionContext,
    user: &User,
    form: &PostForm,
    edit_id: Option<&str>,
    err: crate::domain::ports::PostPersistenceError,
) -> PageResult<HttpResponse> {
    match err {
        crate::domain::ports::PostPersistenceError::DuplicateTitle => rerender_post_form(
            state,
            session,
            user,
            form,
            edit_id,
            "A post with that title already exists.",
        ),
        other => Err(map_post_error(other).into()),
    }
}

fn rerender_post_form(
    state: &HttpState,
    session: &SessionContext,
    user: &User,
    form: &PostForm,
    edit_id: Option<&str>,
    message: &str,
) -> PageResult<HttpResponse> {
    let mut chrome = chrome_for(session, Some(user))?;
    chrome.flashes.push(Flash::error(message));
    let page = Page::PostForm {
        chrome,
        form: PostFormView {
            title: form.title.clone(),
            subtitle: form.subtitle.clone(),
            body: form.body.clone(),
            image_url: form.image_url.clone(),
        },
        edit_id: edit_id.map(str::to_owned),
    };
    render_page(state, &page)
}

async fn find_post(state: &HttpState, raw_id: &str) -> PageResult<Option<Post>> {
    let Ok(post_id) = PostId::parse(raw_id) else {
        return Ok(None);
    };
    Ok(state
        .posts
        .find_by_id(post_id)
        .await
        .map_err(map_post_error)?)
}

async fn load_post_page(
    state: &HttpState,
    raw_id: &str,
) -> PageResult<Option<(Post, Vec<Comment>)>> {
    let Some(post) = find_post(state, raw_id).await? else {
        return Ok(None);
    };
    let comments = state
        .comments
        .list_for_post(post.id())
        .await
        .map_err(map_comment_error)?;
    Ok(Some((post, comments)))
}

/// Resolve display names for a set of user ids, one lookup per unique id.
async fn display_names(
    state: &HttpState,
    ids: impl Iterator<Item = UserId>,
) -> PageResult<HashMap<UserId, String>> {
    let mut names = HashMap::new();
    for id in ids {
        if names.contains_key(&id) {
            continue;
        }
        let name = state
            .identity
            .find_by_id(id)
            .await?
            .map(|user| user.name().as_ref().to_owned());
        if let Some(name) = name {
            names.insert(id, name);
        }
    }
    Ok(names)
}

fn author_name(names: &HashMap<UserId, String>, id: UserId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| "Unknown".to_owned())
}
