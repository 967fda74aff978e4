// Hand-off of a sampled haiku to the outside world.
//
// Posting to a feed and searching for a matching frame are collaborators
// behind `FeedPoster` and `SceneSearch`. The crate ships console/no-op
// implementations; network-backed ones live with the deployment.

use rand::Rng;
use tracing::info;

use crate::error::HaikuError;
use crate::mining::SampledHaiku;
use crate::types::dialogue::ParsedHaiku;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Still,
    Clip,
}

impl MediaKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            MediaKind::Still
        } else {
            MediaKind::Clip
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Still => "jpg",
            MediaKind::Clip => "gif",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMedia {
    pub kind: MediaKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(pub String);

pub trait SceneSearch {
    /// Look up a frame or clip matching the haiku text.
    fn find_scene(
        &self,
        query: &str,
        haiku: &ParsedHaiku,
        kind: MediaKind,
    ) -> Result<Option<SceneMedia>, HaikuError>;
}

pub trait FeedPoster {
    fn post(&mut self, body: &str) -> Result<PostId, HaikuError>;

    fn reply_with_media(&mut self, to: &PostId, media: &SceneMedia) -> Result<PostId, HaikuError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostFormat {
    pub add_metadata: bool,
}

impl PostFormat {
    pub fn render(&self, sampled: &SampledHaiku) -> String {
        let mut body = sampled.text();
        if self.add_metadata {
            if let Some(meta) = &sampled.haiku.episode {
                body.push_str("\n\n");
                body.push_str(&meta.label());
            }
        }
        body
    }
}

/// Post the haiku and, if a scene search is given, reply with matching media.
pub fn publish_haiku<R: Rng + ?Sized>(
    sampled: &SampledHaiku,
    format: PostFormat,
    poster: &mut dyn FeedPoster,
    search: Option<&dyn SceneSearch>,
    rng: &mut R,
) -> Result<PostId, HaikuError> {
    let body = format.render(sampled);
    let post_id = poster.post(&body)?;
    info!(post = %post_id.0, "haiku posted");

    if let Some(search) = search {
        let kind = MediaKind::random(rng);
        match search.find_scene(&sampled.text(), &sampled.haiku, kind)? {
            Some(media) => {
                poster.reply_with_media(&post_id, &media)?;
            }
            None => info!("no matching scene found"),
        }
    }
    Ok(post_id)
}

/// Writes posts to stdout.
#[derive(Debug, Default)]
pub struct ConsolePoster {
    posted: usize,
}

impl FeedPoster for ConsolePoster {
    fn post(&mut self, body: &str) -> Result<PostId, HaikuError> {
        self.posted += 1;
        println!("{}", body);
        Ok(PostId(format!("console-{}", self.posted)))
    }

    fn reply_with_media(&mut self, to: &PostId, media: &SceneMedia) -> Result<PostId, HaikuError> {
        self.posted += 1;
        println!("[reply to {}] {} ({})", to.0, media.url, media.kind.extension());
        Ok(PostId(format!("console-{}", self.posted)))
    }
}
