//! Post listing and editing pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::Value;
use tracing::info;

use crate::api::SharedState;
use crate::auth::RequestContext;
use crate::blog::{Post, PostForm, PostId};
use crate::db::queries;
use crate::error::{Error, Result};

/// Fetch a post by id.
///
/// Fails with [`Error::NotFound`] when no post has this id. With
/// `check_author` set, fails with [`Error::Forbidden`] unless the current
/// user wrote the post.
pub fn get_post(ctx: &RequestContext, id: i64, check_author: bool) -> Result<Post> {
    let post = ctx
        .db
        .with_conn(|conn| queries::get_post(conn, id))?
        .ok_or_else(|| Error::NotFound(format!("Post id {} doesn't exist.", id)))?;

    if check_author && ctx.user_id() != Some(post.author_id) {
        return Err(Error::Forbidden);
    }

    Ok(post)
}

pub async fn index(State(state): State<SharedState>, ctx: RequestContext) -> Result<Html<String>> {
    let posts = ctx.db.with_conn(queries::list_posts)?;
    state.templates.render(
        "blog/index.html",
        &ctx,
        &[],
        &[("posts", Value::from_serialize(&posts))],
    )
}

/// Read-only view of a single post; anyone may look
pub async fn detail(
    State(state): State<SharedState>,
    ctx: RequestContext,
    PostId(id): PostId,
) -> Result<Html<String>> {
    let post = get_post(&ctx, id, false)?;
    state.templates.render(
        "blog/detail.html",
        &ctx,
        &[],
        &[("post", Value::from_serialize(&post))],
    )
}

pub async fn create_form(
    State(state): State<SharedState>,
    ctx: RequestContext,
) -> Result<Html<String>> {
    state.templates.render(
        "blog/create.html",
        &ctx,
        &[],
        &[("form", Value::from_serialize(&PostForm::default()))],
    )
}

pub async fn create(
    State(state): State<SharedState>,
    ctx: RequestContext,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    if let Some(error) = form.validate() {
        let page = state.templates.render(
            "blog/create.html",
            &ctx,
            &[error.to_string()],
            &[("form", Value::from_serialize(&form))],
        )?;
        return Ok(page.into_response());
    }

    let author = ctx.require_user()?;
    let id = ctx
        .db
        .with_conn(|conn| queries::create_post(conn, &form.title, &form.body, author.id))?;
    info!("User {} created post {}", author.username, id);

    Ok(Redirect::to("/").into_response())
}

pub async fn update_form(
    State(state): State<SharedState>,
    ctx: RequestContext,
    PostId(id): PostId,
) -> Result<Html<String>> {
    let post = get_post(&ctx, id, true)?;
    let form = PostForm::from_post(&post);
    state.templates.render(
        "blog/update.html",
        &ctx,
        &[],
        &[
            ("post", Value::from_serialize(&post)),
            ("form", Value::from_serialize(&form)),
        ],
    )
}

pub async fn update(
    State(state): State<SharedState>,
    ctx: RequestContext,
    PostId(id): PostId,
    Form(form): Form<PostForm>,
) -> Result<Response> {
    let post = get_post(&ctx, id, true)?;

    if let Some(error) = form.validate() {
        let page = state.templates.render(
            "blog/update.html",
            &ctx,
            &[error.to_string()],
            &[
                ("post", Value::from_serialize(&post)),
                ("form", Value::from_serialize(&form)),
            ],
        )?;
        return Ok(page.into_response());
    }

    ctx.db
        .with_conn(|conn| queries::update_post(conn, id, &form.title, &form.body))?;
    info!("Post {} updated", id);

    Ok(Redirect::to("/").into_response())
}

pub async fn delete(ctx: RequestContext, PostId(id): PostId) -> Result<Redirect> {
    get_post(&ctx, id, true)?;
    ctx.db.with_conn(|conn| queries::delete_post(conn, id))?;
    info!("Post {} deleted", id);

    Ok(Redirect::to("/"))
}
