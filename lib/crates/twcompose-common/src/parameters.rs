//! Stream parameters (`expansions`, `*_fields`) and their query-string form.

use serde::{Deserialize, Serialize};

/// Declares a closed set of string values with their wire spelling.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Value as sent to the stream endpoint.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }
    };
}

wire_enum! {
    /// Object expansions requested on each streamed tweet.
    Expansion {
        AttachmentsPollIds => "attachments.poll_ids",
        AttachmentsMediaKeys => "attachments.media_keys",
        AuthorId => "author_id",
        EntitiesMentionsUsername => "entities.mentions.username",
        GeoPlaceId => "geo.place_id",
        InReplyToUserId => "in_reply_to_user_id",
        ReferencedTweetsId => "referenced_tweets.id",
        ReferencedTweetsIdAuthorId => "referenced_tweets.id.author_id",
    }
}

wire_enum! {
    MediaField {
        DurationMs => "duration_ms",
        Height => "height",
        MediaKey => "media_key",
        PreviewImageUrl => "preview_image_url",
        Type => "type",
        Url => "url",
        Width => "width",
        PublicMetrics => "public_metrics",
        AltText => "alt_text",
    }
}

wire_enum! {
    PlaceField {
        ContainedWithin => "contained_within",
        Country => "country",
        CountryCode => "country_code",
        FullName => "full_name",
        Geo => "geo",
        Id => "id",
        Name => "name",
        PlaceType => "place_type",
    }
}

wire_enum! {
    PollField {
        DurationMinutes => "duration_minutes",
        EndDatetime => "end_datetime",
        Id => "id",
        Options => "options",
        VotingStatus => "voting_status",
    }
}

wire_enum! {
    TweetField {
        Attachments => "attachments",
        AuthorId => "author_id",
        ContextAnnotations => "context_annotations",
        ConversationId => "conversation_id",
        CreatedAt => "created_at",
        Entities => "entities",
        Geo => "geo",
        Id => "id",
        InReplyToUserId => "in_reply_to_user_id",
        Lang => "lang",
        PublicMetrics => "public_metrics",
        PossiblySensitive => "possibly_sensitive",
        ReferencedTweets => "referenced_tweets",
        ReplySettings => "reply_settings",
        Source => "source",
        Text => "text",
        Withheld => "withheld",
    }
}

wire_enum! {
    UserField {
        CreatedAt => "created_at",
        Description => "description",
        Entities => "entities",
        Id => "id",
        Location => "location",
        Name => "name",
        PinnedTweetId => "pinned_tweet_id",
        ProfileImageUrl => "profile_image_url",
        Protected => "protected",
        PublicMetrics => "public_metrics",
        Url => "url",
        Username => "username",
        Verified => "verified",
        Withheld => "withheld",
    }
}

/// `parameters:` section of the compose file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamParameters {
    pub expansions: Vec<Expansion>,
    pub media_fields: Vec<MediaField>,
    pub place_fields: Vec<PlaceField>,
    pub poll_fields: Vec<PollField>,
    pub tweet_fields: Vec<TweetField>,
    pub user_fields: Vec<UserField>,
}

impl StreamParameters {
    /// Query-string passed to the collector with `-p`.
    ///
    /// Empty selections are skipped, `<prefix>_fields` keys are spelled
    /// `<prefix>.fields` and list values are comma-joined before
    /// form-url-encoding.
    #[must_use]
    pub fn to_querystring(&self) -> String {
        let pairs: [(&str, Vec<&str>); 6] = [
            ("expansions", self.expansions.iter().map(|v| v.as_str()).collect()),
            ("media_fields", self.media_fields.iter().map(|v| v.as_str()).collect()),
            ("place_fields", self.place_fields.iter().map(|v| v.as_str()).collect()),
            ("poll_fields", self.poll_fields.iter().map(|v| v.as_str()).collect()),
            ("tweet_fields", self.tweet_fields.iter().map(|v| v.as_str()).collect()),
            ("user_fields", self.user_fields.iter().map(|v| v.as_str()).collect()),
        ];

        let mut qs = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in pairs {
            if values.is_empty() {
                continue;
            }
            let key = match key.strip_suffix("_fields") {
                Some(prefix) => format!("{prefix}.fields"),
                None => key.to_string(),
            };
            qs.append_pair(&key, &values.join(","));
        }
        qs.finish()
    }
}
