//! Response documents and member routing.
//!
//! Every response is wrapped in an `lfm` envelope:
//!
//! ```xml
//! <lfm status="ok">
//!   <toptracks artist="Cher" page="1" perPage="50" totalPages="4" total="200">
//!     <track rank="1"><name>Believe</name>...</track>
//!     <track rank="2">...</track>
//!   </toptracks>
//! </lfm>
//! ```
//!
//! or, on failure:
//!
//! ```xml
//! <lfm status="failed"><error code="6">Artist not found</error></lfm>
//! ```

use crate::error::{Result, ScrobblerError};
use roxmltree::{Document, Node};
use tracing::warn;

/// Parse a response body into a document.
pub fn parse(body: &str) -> Result<Document<'_>> {
    Ok(Document::parse(body)?)
}

/// Map a `status="failed"` envelope to [`ScrobblerError::Api`].
pub fn check_status(doc: &Document<'_>) -> Result<()> {
    let root = doc.root_element();
    if root.attribute("status") != Some("failed") {
        return Ok(());
    }
    let error = child_elements(root, "error").next();
    let code = error
        .and_then(|e| e.attribute("code"))
        .and_then(|c| c.trim().parse().ok())
        .unwrap_or(0);
    let message = error
        .and_then(|e| e.text())
        .map_or("unknown error", str::trim)
        .to_owned();
    warn!(code, %message, "request failed");
    Err(ScrobblerError::Api { code, message })
}

/// Collect `member` elements inside `container`, in document order.
///
/// `container` names a child of the root element. It may also be a
/// `/`-separated path to a nested container (`results/trackmatches`).
/// Every matching container contributes; no match, including an empty
/// `container`, yields an empty vector.
pub fn extract_elements<'a, 'input>(
    doc: &'a Document<'input>,
    container: &str,
    member: &str,
) -> Vec<Node<'a, 'input>> {
    containers(doc, container)
        .into_iter()
        .flat_map(|c| child_elements(c, member))
        .collect()
}

/// Collect `member` elements sitting directly under the root, as in
/// `<lfm><user>...</user></lfm>`.
pub fn extract_root_members<'a, 'input>(
    doc: &'a Document<'input>,
    member: &str,
) -> Vec<Node<'a, 'input>> {
    child_elements(doc.root_element(), member).collect()
}

fn containers<'a, 'input>(doc: &'a Document<'input>, container: &str) -> Vec<Node<'a, 'input>> {
    let mut segments = container.split('/').filter(|s| !s.is_empty()).peekable();
    if segments.peek().is_none() {
        return Vec::new();
    }
    let mut nodes = vec![doc.root_element()];
    for segment in segments {
        nodes = nodes
            .into_iter()
            .flat_map(|n| child_elements(n, segment))
            .collect();
    }
    nodes
}

/// Element children of `node` whose local name is `name`.
pub fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

/// Trimmed text of the first `name` child of the root, if any.
pub fn root_text(doc: &Document<'_>, name: &str) -> Option<String> {
    child_elements(doc.root_element(), name)
        .next()
        .and_then(|n| n.text())
        .map(|t| t.trim().to_owned())
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total: u64,
}

/// Pagination metadata of a result container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total: u64,
}

impl PageInfo {
    /// Read pagination along the `container` path, deepest node first.
    ///
    /// Chart-style responses carry `page/perPage/totalPages/total`
    /// attributes on the container; search responses carry
    /// `opensearch:totalResults/startIndex/itemsPerPage` children on
    /// `results`. Missing data yields zeros.
    pub fn from_document(doc: &Document<'_>, container: &str) -> Self {
        let mut path = vec![doc.root_element()];
        for segment in container.split('/').filter(|s| !s.is_empty()) {
            let Some(next) = path.last().and_then(|n| child_elements(*n, segment).next()) else {
                break;
            };
            path.push(next);
        }
        path.iter()
            .rev()
            .find_map(|n| Self::from_attributes(*n).or_else(|| Self::from_opensearch(*n)))
            .unwrap_or_default()
    }

    fn from_attributes(node: Node<'_, '_>) -> Option<Self> {
        let num = |name: &str| node.attribute(name).and_then(|v| v.trim().parse::<u64>().ok());
        let total = num("total")?;
        Some(Self {
            page: num("page").unwrap_or(1),
            per_page: num("perPage").unwrap_or(0),
            total_pages: num("totalPages").unwrap_or(0),
            total,
        })
    }

    fn from_opensearch(node: Node<'_, '_>) -> Option<Self> {
        let num = |name: &str| {
            child_elements(node, name)
                .next()
                .and_then(|n| n.text())
                .and_then(|t| t.trim().parse::<u64>().ok())
        };
        let total = num("totalResults")?;
        let per_page = num("itemsPerPage").unwrap_or(0);
        let start = num("startIndex").unwrap_or(0);
        let (page, total_pages) = if per_page == 0 {
            (1, 0)
        } else {
            (start / per_page + 1, total.div_ceil(per_page))
        };
        Some(Self {
            page,
            per_page,
            total_pages,
            total,
        })
    }

    /// Attach items to this metadata.
    pub fn with_items<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(nodes: &[Node<'_, '_>]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| n.text().unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn members_in_document_order() {
        let doc = parse("<lfm><tracks><track>A</track><track>B</track></tracks></lfm>").unwrap();
        let nodes = extract_elements(&doc, "tracks", "track");
        assert_eq!(texts(&nodes), ["A", "B"]);
    }

    #[test]
    fn missing_container_yields_empty() {
        let doc = parse("<lfm><artists><artist/></artists></lfm>").unwrap();
        assert!(extract_elements(&doc, "tracks", "track").is_empty());
        assert!(extract_elements(&doc, "artists", "track").is_empty());
    }

    #[test]
    fn every_matching_container_contributes() {
        let doc = parse(
            "<lfm><tracks><track>A</track><other>x</other></tracks>\
             <tracks><track>B</track></tracks></lfm>",
        )
        .unwrap();
        let nodes = extract_elements(&doc, "tracks", "track");
        assert_eq!(texts(&nodes), ["A", "B"]);
    }

    #[test]
    fn nested_container_path() {
        let doc = parse(
            "<lfm><results><trackmatches><track>A</track></trackmatches></results></lfm>",
        )
        .unwrap();
        assert_eq!(texts(&extract_elements(&doc, "results/trackmatches", "track")), ["A"]);
        assert!(extract_elements(&doc, "trackmatches", "track").is_empty());
    }

    #[test]
    fn empty_container_matches_nothing() {
        let doc = parse("<lfm status=\"ok\"><user><name>rj</name></user></lfm>").unwrap();
        assert!(extract_elements(&doc, "", "user").is_empty());
        assert!(extract_elements(&doc, "/", "user").is_empty());
        assert_eq!(extract_root_members(&doc, "user").len(), 1);
        assert!(extract_root_members(&doc, "track").is_empty());
    }

    #[test]
    fn failed_envelope_maps_to_api_error() {
        let doc = parse(r#"<lfm status="failed"><error code="10">Invalid API key</error></lfm>"#)
            .unwrap();
        match check_status(&doc) {
            Err(ScrobblerError::Api { code, message }) => {
                assert_eq!(code, 10);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected: {other:?}"),
        }
        let ok = parse(r#"<lfm status="ok"><tracks/></lfm>"#).unwrap();
        assert!(check_status(&ok).is_ok());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        assert!(matches!(parse("<lfm><tracks></lfm>"), Err(ScrobblerError::Parse(_))));
    }

    #[test]
    fn page_info_from_attributes() {
        let doc = parse(
            r#"<lfm><toptracks page="2" perPage="50" totalPages="4" total="200"/></lfm>"#,
        )
        .unwrap();
        let info = PageInfo::from_document(&doc, "toptracks");
        assert_eq!(
            info,
            PageInfo { page: 2, per_page: 50, total_pages: 4, total: 200 }
        );
    }

    #[test]
    fn page_info_from_opensearch() {
        let doc = parse(
            r#"<lfm><results xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
                 <opensearch:totalResults>45</opensearch:totalResults>
                 <opensearch:startIndex>20</opensearch:startIndex>
                 <opensearch:itemsPerPage>20</opensearch:itemsPerPage>
                 <trackmatches/>
               </results></lfm>"#,
        )
        .unwrap();
        let info = PageInfo::from_document(&doc, "results/trackmatches");
        assert_eq!(
            info,
            PageInfo { page: 2, per_page: 20, total_pages: 3, total: 45 }
        );
    }

    #[test]
    fn root_text_reads_token() {
        let doc = parse("<lfm status=\"ok\"><token> abc123 </token></lfm>").unwrap();
        assert_eq!(root_text(&doc, "token").as_deref(), Some("abc123"));
        assert_eq!(root_text(&doc, "missing"), None);
    }
}
