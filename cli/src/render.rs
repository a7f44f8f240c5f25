//! Plain-text rendering of posts, users and listings.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use wordnest::net::types::{Pagination, Post, User, UserStats};
use wordnest::util::date::format_date;

pub fn post(post: &Post) -> String {
    let mut out = format!("#{} {}\nby {} on {}\n", post.id, post.title, post.author_name, format_date(&post.created_at));
    if let Some(url) = &post.image_url {
        let _ = writeln!(out, "image: {url}");
    }
    let _ = write!(out, "\n{}", post.content);
    out
}

pub fn listing(posts: &[Post], pagination: Option<&Pagination>) -> String {
    if posts.is_empty() {
        return "No posts yet.".to_owned();
    }
    let mut out = String::new();
    for post in posts {
        let _ = writeln!(
            out,
            "#{:<5} {}  ({}, {})",
            post.id,
            post.title,
            post.author_name,
            format_date(&post.created_at)
        );
    }
    if let Some(p) = pagination {
        let _ = write!(out, "page {} of {} ({} posts)", p.current_page, p.total_pages.max(1), p.total_posts);
    }
    out.trim_end().to_owned()
}

pub fn user(user: &User) -> String {
    let mut out = format!("{} <{}>\nid: {}\njoined: {}\n", user.username, user.email, user.id, format_date(&user.created_at));
    if let Some(bio) = user.bio.as_deref().filter(|bio| !bio.is_empty()) {
        let _ = writeln!(out, "bio: {bio}");
    }
    if let Some(url) = &user.profile_picture_url {
        let _ = writeln!(out, "avatar: {url}");
    }
    out.trim_end().to_owned()
}

pub fn stats(stats: &UserStats) -> String {
    match &stats.latest_post_date {
        Some(latest) => format!("posts: {}\nlatest: {}", stats.total_posts, format_date(latest)),
        None => format!("posts: {}", stats.total_posts),
    }
}
