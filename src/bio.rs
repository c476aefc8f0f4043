//! Author card shown at the top of the index.

use serde::Serialize;

use crate::config::SiteMetadata;

pub const AVATAR_SIZE: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    /// Lowercase network id, used for the icon class.
    pub network: &'static str,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub alt: &'static str,
}

/// The part of the card shown only when the author has a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BioDescription {
    pub name: String,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub links: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bio {
    pub avatar: Avatar,
    pub description: Option<BioDescription>,
}

impl Bio {
    pub fn from_site(site: &SiteMetadata) -> Self {
        let avatar = Avatar {
            src: site.author.avatar.clone(),
            width: AVATAR_SIZE,
            height: AVATAR_SIZE,
            alt: "Profile picture",
        };

        let description = site
            .author
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| BioDescription {
                name: name.to_string(),
                summary: site.author.summary.clone(),
                location: site.author.location.clone(),
                links: social_links(site),
            });

        Bio {
            avatar,
            description,
        }
    }
}

/// GitHub, LinkedIn, Twitter, in that order, skipping unset accounts.
fn social_links(site: &SiteMetadata) -> Vec<SocialLink> {
    let social = &site.social;
    let mut links = Vec::with_capacity(3);

    if let Some(handle) = non_empty(&social.github) {
        links.push(SocialLink {
            network: "github",
            label: "GitHub",
            url: format!("https://github.com/{handle}"),
        });
    }
    if let Some(url) = non_empty(&social.linkedin) {
        links.push(SocialLink {
            network: "linkedin",
            label: "LinkedIn",
            url: url.to_string(),
        });
    }
    if let Some(handle) = non_empty(&social.twitter) {
        links.push(SocialLink {
            network: "twitter",
            label: "Twitter",
            url: format!("https://twitter.com/{}", handle.trim_start_matches('@')),
        });
    }

    links
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
