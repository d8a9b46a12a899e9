//! Pure markup builders.
//!
//! Each function turns data into an HTML fragment and does nothing else, so
//! everything here can be tested without a display. Interpolated text is
//! always escaped.

use crate::api::{Anime, Episode};
use std::borrow::Cow;

const HERO_TITLE: &str = "Discover Amazing Anime";
const HERO_SUBTITLE: &str = "Stream thousands of episodes from your favorite anime series. \
    Enjoy high-quality content with our beautiful streaming platform.";

/// Message shown in place of the grid when a search has no hits.
pub const EMPTY_SEARCH_MESSAGE: &str = "No anime found matching your search.";

/// Escapes the HTML special characters in `s`, borrowing when nothing changes.
pub fn html_escape(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

fn genre_tags(genres: &[String]) -> String {
    genres
        .iter()
        .map(|genre| format!(r#"<span class="genre-tag">{}</span>"#, html_escape(genre)))
        .collect()
}

fn back_link(label: &str) -> String {
    format!(r##"<a href="#/" class="back-button">{}</a>"##, label)
}

/// A clickable card for one anime, linking to its details page.
pub fn anime_card(anime: &Anime) -> String {
    let id = urlencoding::encode(&anime.id);
    let title = html_escape(&anime.title);
    format!(
        r##"<a class="anime-card" href="#/anime/{id}" data-anime-id="{id}"><div class="anime-card-image"><img src="{poster}" alt="{title}" loading="lazy"><div class="anime-card-rating">{rating}</div></div><div class="anime-card-content"><h3 class="anime-card-title">{title}</h3><div class="anime-card-genres">{genres}</div></div></a>"##,
        id = id,
        poster = html_escape(&anime.poster),
        title = title,
        rating = anime.rating,
        genres = genre_tags(&anime.genres),
    )
}

/// A card for one episode.
pub fn episode_card(episode: &Episode) -> String {
    format!(
        r#"<div class="episode-card" data-episode-id="{id}" data-video-url="{video}"><div class="episode-thumbnail"><img src="{thumbnail}" alt="{title}" loading="lazy"><div class="episode-duration">{duration}</div></div><div class="episode-info"><div class="episode-number">Episode {number}</div><div class="episode-title">{title}</div></div></div>"#,
        id = html_escape(&episode.id),
        video = html_escape(&episode.video_url),
        thumbnail = html_escape(&episode.thumbnail),
        title = html_escape(&episode.title),
        duration = html_escape(&episode.duration),
        number = episode.episode_number,
    )
}

/// A single skeleton placeholder card.
pub fn skeleton_card() -> &'static str {
    r#"<div class="skeleton-card"><div class="skeleton skeleton-image"></div><div class="skeleton-content"><div class="skeleton skeleton-title"></div><div class="skeleton skeleton-text"></div><div class="skeleton skeleton-text short"></div></div></div>"#
}

/// A grid of `count` skeleton cards.
pub fn loading_grid(count: usize) -> String {
    format!(r#"<div class="anime-grid">{}</div>"#, skeleton_card().repeat(count))
}

fn anime_grid(listing: &[Anime]) -> String {
    let cards: String = listing.iter().map(anime_card).collect();
    format!(r#"<div class="anime-grid">{}</div>"#, cards)
}

fn page(title: &str, subtitle: &str, body: &str) -> String {
    format!(
        r#"<div class="homepage"><section class="hero-section"><h1 class="hero-title">{}</h1><p class="hero-subtitle">{}</p></section>{}</div>"#,
        title, subtitle, body
    )
}

/// Home page with a skeleton grid, shown while the listing loads.
pub fn home_loading(count: usize) -> String {
    page(HERO_TITLE, HERO_SUBTITLE, &loading_grid(count))
}

/// Home page with the full listing.
pub fn home_page(listing: &[Anime]) -> String {
    page(HERO_TITLE, HERO_SUBTITLE, &anime_grid(listing))
}

/// Home page shown when the listing could not be loaded.
pub fn home_error() -> String {
    page(
        HERO_TITLE,
        "Stream thousands of episodes from your favorite anime series.",
        r##"<div class="error-message"><p>Failed to load anime content</p><a href="#/" class="back-button">Try Again</a></div>"##,
    )
}

/// Search page with a skeleton grid, shown while results load.
pub fn search_loading(query: &str, count: usize) -> String {
    page(
        "Search Results",
        &format!("Showing results for: &quot;{}&quot;", html_escape(query)),
        &loading_grid(count),
    )
}

/// Search page listing `results`, or the empty-state message when there are none.
pub fn search_results(query: &str, results: &[Anime]) -> String {
    let grid = if results.is_empty() {
        format!(
            r#"<div class="anime-grid"><div class="empty-state"><p>{}</p></div></div>"#,
            EMPTY_SEARCH_MESSAGE
        )
    } else {
        anime_grid(results)
    };
    page(
        "Search Results",
        &format!(
            "Found {} results for: &quot;{}&quot;",
            results.len(),
            html_escape(query)
        ),
        &grid,
    )
}

/// Search page shown when the backend failed to answer.
pub fn search_error(query: &str) -> String {
    page(
        "Search Results",
        &format!("Search failed for: &quot;{}&quot;", html_escape(query)),
        &format!(
            r#"<div class="error-message"><p>Something went wrong while searching.</p>{}</div>"#,
            back_link("Back to Home")
        ),
    )
}

/// Details page for one anime and its episodes.
pub fn details_page(anime: &Anime, episodes: &[Episode]) -> String {
    let mut meta = format!(r#"<div class="meta-item">{}/10</div>"#, anime.rating);
    if let Some(year) = anime.year {
        meta.push_str(&format!(r#"<div class="meta-item">{}</div>"#, year));
    }
    if let Some(count) = anime.episodes {
        meta.push_str(&format!(r#"<div class="meta-item">{} Episodes</div>"#, count));
    }
    if !anime.status.is_empty() {
        meta.push_str(&format!(
            r#"<div class="meta-item">{}</div>"#,
            html_escape(&anime.status)
        ));
    }

    let episode_cards: String = episodes.iter().map(episode_card).collect();
    format!(
        r#"<div class="details-page">{back}<div class="anime-header"><div class="anime-poster"><img src="{poster}" alt="{title}"></div><div class="anime-info"><h1 class="anime-title">{title}</h1><div class="anime-meta">{meta}</div><div class="anime-card-genres">{genres}</div><p class="anime-synopsis">{synopsis}</p></div></div><section class="episodes-section"><h2 class="section-title">Episodes ({count})</h2><div class="episodes-grid">{episodes}</div></section></div>"#,
        back = back_link("Back to Home"),
        poster = html_escape(&anime.poster),
        title = html_escape(&anime.title),
        meta = meta,
        genres = genre_tags(&anime.genres),
        synopsis = html_escape(&anime.synopsis),
        count = episodes.len(),
        episodes = episode_cards,
    )
}

/// Details page shown when the anime or its episodes could not be loaded.
pub fn details_error() -> String {
    format!(
        r#"<div class="details-page">{}<div class="error-message"><h2>Anime Not Found</h2><p>The anime you&#x27;re looking for doesn&#x27;t exist or couldn&#x27;t be loaded.</p>{}</div></div>"#,
        back_link("Back to Home"),
        back_link("Return to Homepage")
    )
}

/// The 404 page, with a way back to `#/`.
pub fn not_found_page() -> String {
    format!(
        r#"<div class="error-page"><div class="error-content"><h1 class="error-title">404</h1><p class="error-message">Page not found</p>{}</div></div>"#,
        back_link("Back to Home")
    )
}
