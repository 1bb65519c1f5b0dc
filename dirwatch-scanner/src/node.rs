use chrono::NaiveDateTime;
use percent_encoding::percent_decode_str;
use url::Url;

/// What a crawled URL turned out to be. Decided once, from the HEAD response.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The server sent `Last-Modified`. `modified` is `None` when that header
    /// could not be parsed.
    File { modified: Option<NaiveDateTime> },
    /// No `Last-Modified`; children are filled in by a single expansion.
    Directory {
        children: Vec<ResourceNode>,
        expanded: bool,
    },
}

/// One URL encountered during a crawl.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub url: Url,
    kind: NodeKind,
}

impl ResourceNode {
    pub fn file(url: Url, modified: Option<NaiveDateTime>) -> Self {
        Self {
            url,
            kind: NodeKind::File { modified },
        }
    }

    pub fn directory(url: Url) -> Self {
        Self {
            url,
            kind: NodeKind::Directory {
                children: Vec::new(),
                expanded: false,
            },
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn modified(&self) -> Option<NaiveDateTime> {
        match self.kind {
            NodeKind::File { modified } => modified,
            NodeKind::Directory { .. } => None,
        }
    }

    /// Children in listing order. Always empty for files.
    pub fn children(&self) -> &[ResourceNode] {
        match &self.kind {
            NodeKind::Directory { children, .. } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ResourceNode] {
        match &mut self.kind {
            NodeKind::Directory { children, .. } => children,
            NodeKind::File { .. } => &mut [],
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { expanded: true, .. })
    }

    /// Claim this directory for expansion. Returns false for files and for
    /// directories that were already claimed, so the caller skips them.
    pub(crate) fn begin_expansion(&mut self) -> bool {
        match &mut self.kind {
            NodeKind::Directory { expanded, .. } if !*expanded => {
                *expanded = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn attach_children(&mut self, new_children: Vec<ResourceNode>) {
        if let NodeKind::Directory { children, .. } = &mut self.kind {
            debug_assert!(children.is_empty(), "children attached twice");
            *children = new_children;
        }
    }

    /// Percent-decoded last path segment, keeping the trailing `/` of
    /// directory-style URLs (`Project/`, `syllabus 2018.pdf`).
    pub fn name(&self) -> String {
        display_name(&self.url)
    }

    /// Pre-order walk over this node and everything below it.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn file_count(&self) -> usize {
        self.walk().filter(|n| n.is_file()).count()
    }

    pub fn directory_count(&self) -> usize {
        self.walk().filter(|n| n.is_directory()).count()
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a ResourceNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ResourceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

pub fn display_name(url: &Url) -> String {
    let path = url.path();
    let trimmed = path.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or("");

    if segment.is_empty() {
        return url.host_str().unwrap_or("/").to_string();
    }

    let mut name = percent_decode_str(segment).decode_utf8_lossy().into_owned();
    if path.ends_with('/') {
        name.push('/');
    }
    name
}
