//! Server-side HTML for the list and detail pages.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use nw_core::dates::format_published_at;
use nw_core::Article;

const SITE_TITLE: &str = "Top Headlines";

const STYLE: &str = "\
body{font-family:Georgia,serif;max-width:960px;margin:0 auto;padding:1rem;color:#222}\
header a{color:inherit;text-decoration:none}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:1.5rem}\
.card img,.hero{width:100%;object-fit:cover;border-radius:4px}\
.card img{height:160px}\
.meta{color:#666;font-size:.85rem}\
article p{line-height:1.6}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <header><h1><a href=\"/\">{SITE_TITLE}</a></h1></header>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = text(title),
    )
}

fn meta_line(article: &Article) -> String {
    let when = format_published_at(article.published_at.as_ref());
    if article.source_name.is_empty() {
        format!("<p class=\"meta\">{}</p>", text(&when))
    } else {
        format!(
            "<p class=\"meta\">{} &middot; {}</p>",
            text(&article.source_name),
            text(&when)
        )
    }
}

pub fn index_page(articles: &[Article]) -> String {
    let mut body = String::from("<section class=\"grid\">\n");
    for article in articles {
        let link = format!("/article/{}", article.id);
        let _ = write!(
            body,
            "<div class=\"card\">\n<a href=\"{link}\"><img src=\"{image}\" alt=\"{alt}\"></a>\n\
             <h2><a href=\"{link}\">{title}</a></h2>\n{meta}\n<p>{description}</p>\n</div>\n",
            image = attr(&article.image_url),
            alt = attr(&article.title),
            title = text(&article.title),
            meta = meta_line(article),
            description = text(&article.description),
        );
    }
    body.push_str("</section>\n");
    layout(SITE_TITLE, &body)
}

pub fn article_page(article: &Article) -> String {
    let mut body = String::from("<article>\n");
    let _ = write!(
        body,
        "<h2>{title}</h2>\n{meta}\n<img class=\"hero\" src=\"{image}\" alt=\"{alt}\">\n",
        title = text(&article.title),
        meta = meta_line(article),
        image = attr(&article.image_url),
        alt = attr(&article.title),
    );

    for paragraph in article
        .body()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
    {
        let _ = writeln!(body, "<p>{}</p>", text(paragraph));
    }

    if article.has_source() {
        let _ = writeln!(
            body,
            "<p><a href=\"{}\" rel=\"noopener\" target=\"_blank\">Read the original article</a></p>",
            attr(&article.source_url)
        );
    }
    body.push_str("<p><a href=\"/\">&larr; Back to headlines</a></p>\n</article>\n");
    layout(&article.title, &body)
}

pub fn not_found_page(id: u32) -> String {
    let body = format!(
        "<h2>Article not found</h2>\n<p>There is no article with id {}.</p>\n\
         <p><a href=\"/\">&larr; Back to headlines</a></p>\n",
        id
    );
    layout("Not found", &body)
}
