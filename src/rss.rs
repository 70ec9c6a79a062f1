//! RSS 2.0 serialization.
//!
//! The document is built event-by-event with `quick-xml` so every free-text
//! field goes through the escaper. Descriptions are CDATA-wrapped to keep
//! scraped markup fragments readable in the raw file; a payload containing
//! the CDATA terminator falls back to regular escaped text.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{FeedError, FeedResult};
use crate::feed::{Feed, FeedItem};

/// Serialize `feed` as a complete RSS 2.0 document.
pub fn write_rss(feed: &Feed) -> FeedResult<String> {
    let bytes = build(feed).map_err(|e| FeedError::Xml(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FeedError::Xml(e.to_string()))
}

type WriteResult<T> = Result<T, Box<dyn std::error::Error>>;

fn build(feed: &Feed) -> WriteResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &feed.title)?;
    text_element(&mut writer, "link", &feed.link)?;
    text_element(&mut writer, "description", &feed.description)?;
    text_element(&mut writer, "lastBuildDate", &feed.last_build_date.to_rfc2822())?;

    for item in &feed.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    Ok(writer.into_inner())
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &FeedItem) -> WriteResult<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    text_element(writer, "title", &item.title)?;
    text_element(writer, "link", &item.link)?;

    // The guid is a content fingerprint, not a URL.
    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&item.guid)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    text_element(writer, "pubDate", &item.published_at.to_rfc2822())?;
    description_element(writer, &item.description)?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> WriteResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn description_element(writer: &mut Writer<Vec<u8>>, text: &str) -> WriteResult<()> {
    if text.contains("]]>") {
        // CDATA cannot contain its own terminator.
        return text_element(writer, "description", text);
    }
    writer.write_event(Event::Start(BytesStart::new("description")))?;
    writer.write_event(Event::CData(BytesCData::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("description")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::extract::Extracted;
    use chrono::Utc;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn feed_with(texts: &[&str]) -> Feed {
        let config = FeedConfig::new("https://example.com/company/acme").unwrap();
        let extracted: Vec<Extracted> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| Extracted {
                index,
                text: text.to_string(),
            })
            .collect();
        Feed::from_texts(&config, &extracted, Utc::now())
    }

    /// Round-trip the document and return (item count, descriptions).
    /// Panics on any malformed-XML event.
    fn parse_back(xml: &str) -> (usize, Vec<String>) {
        let mut reader = Reader::from_str(xml);
        let mut items = 0;
        let mut descriptions = Vec::new();
        let mut in_description = false;
        let mut current = String::new();

        loop {
            match reader.read_event().expect("well-formed XML") {
                Event::Start(e) => match e.name().as_ref() {
                    b"item" => items += 1,
                    b"description" if items > 0 => {
                        in_description = true;
                        current.clear();
                    }
                    _ => {}
                },
                Event::Text(e) if in_description => {
                    current.push_str(&e.unescape().expect("valid escapes"));
                }
                Event::CData(e) if in_description => {
                    current.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Event::End(e) if e.name().as_ref() == b"description" && in_description => {
                    in_description = false;
                    descriptions.push(current.clone());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        (items, descriptions)
    }

    #[test]
    fn emits_well_formed_rss_with_channel_metadata() {
        let xml = write_rss(&feed_with(&["A post body that is long enough to be kept"])).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<lastBuildDate>"));
        let (items, _) = parse_back(&xml);
        assert_eq!(items, 1);
    }

    #[test]
    fn angle_brackets_and_ampersands_survive_round_trip() {
        let text = "Posted <b>today</b> & tagged #rust";
        let xml = write_rss(&feed_with(&[text])).unwrap();
        let (items, descriptions) = parse_back(&xml);
        assert_eq!(items, 1);
        assert_eq!(descriptions[0], text);
    }

    #[test]
    fn cdata_terminator_in_text_stays_well_formed() {
        let text = "tricky ]]> payload that would break a naive CDATA block";
        let xml = write_rss(&feed_with(&[text])).unwrap();
        let (items, descriptions) = parse_back(&xml);
        assert_eq!(items, 1);
        assert_eq!(descriptions[0], text);
    }

    #[test]
    fn channel_title_is_escaped_too() {
        let mut feed = feed_with(&["Some post body long enough to keep around"]);
        feed.title = "Posts & <updates>".to_string();
        let xml = write_rss(&feed).unwrap();
        let (items, _) = parse_back(&xml);
        assert_eq!(items, 1);
        assert!(xml.contains("Posts &amp; &lt;updates&gt;"));
    }

    #[test]
    fn empty_feed_is_still_well_formed() {
        let xml = write_rss(&feed_with(&[])).unwrap();
        let (items, _) = parse_back(&xml);
        assert_eq!(items, 0);
    }

    #[test]
    fn guids_are_marked_non_permalink() {
        let xml = write_rss(&feed_with(&["A post body that is long enough to be kept"])).unwrap();
        assert!(xml.contains(r#"<guid isPermaLink="false">"#));
    }
}
