use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use crate::catalog_client::FreeOffer;

const MONTHS_RU: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

const MSK_OFFSET_SECONDS: i32 = 3 * 3600;

/// Escapes text destined for an HTML-formatted Telegram caption. Offer
/// titles come from the upstream catalog and are untrusted.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders a timestamp as "<day> <month name> <HH>:<MM>" in Moscow time
/// (fixed UTC+3). An absent timestamp renders as the empty string.
pub fn format_msk_date(timestamp: Option<DateTime<Utc>>) -> String {
    let timestamp = match timestamp {
        Some(value) => value,
        None => return String::new(),
    };
    let msk = FixedOffset::east_opt(MSK_OFFSET_SECONDS).unwrap();
    let local = timestamp.with_timezone(&msk);
    format!(
        "{} {} {:02}:{:02}",
        local.day(),
        MONTHS_RU[local.month0() as usize],
        local.hour(),
        local.minute()
    )
}

/// Builds the HTML caption: a clickable bold title plus the free-until
/// time in Moscow time.
pub fn build_caption(offer: &FreeOffer) -> String {
    format!(
        "<a href=\"{url}\"><b>{title}</b></a>\n\n<i>Бесплатно до {end} МСК</i>",
        url = offer.store_url,
        title = escape_html(&offer.title),
        end = format_msk_date(offer.end),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escapes_html_markup_in_titles() {
        assert_eq!(
            escape_html("Tom & Jerry <deluxe> \"cut\""),
            "Tom &amp; Jerry &lt;deluxe&gt; &quot;cut&quot;"
        );
    }

    #[test]
    fn formats_msk_date_with_day_rollover() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 21, 0, 0).unwrap();
        assert_eq!(format_msk_date(Some(utc)), "16 января 00:00");
    }

    #[test]
    fn formats_msk_date_in_the_same_day() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 3, 12, 5, 0).unwrap();
        assert_eq!(format_msk_date(Some(utc)), "3 июня 15:05");
    }

    #[test]
    fn absent_timestamp_renders_empty() {
        assert_eq!(format_msk_date(None), "");
    }

    #[test]
    fn caption_links_the_escaped_title() {
        let offer = FreeOffer {
            id: "abc".to_string(),
            title: "Cat & Dog".to_string(),
            image_url: None,
            store_url: "https://store.epicgames.com/p/cat-dog".to_string(),
            start: None,
            end: Some(Utc.with_ymd_and_hms(2024, 1, 15, 21, 0, 0).unwrap()),
        };
        assert_eq!(
            build_caption(&offer),
            "<a href=\"https://store.epicgames.com/p/cat-dog\"><b>Cat &amp; Dog</b></a>\n\n\
             <i>Бесплатно до 16 января 00:00 МСК</i>"
        );
    }
}
