//! Static tool registry backing the `tools` listing.

pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

pub const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "split",
        description: "Split every page of a PDF into its own file",
        category: "PDF",
    },
    ToolInfo {
        name: "split-ranges",
        description: "Extract selected pages into per-page files",
        category: "PDF",
    },
    ToolInfo {
        name: "multiply",
        description: "Copy a one-page PDF once per name",
        category: "PDF",
    },
    ToolInfo {
        name: "delete-pages",
        description: "Write a copy of a PDF without selected pages",
        category: "PDF",
    },
    ToolInfo {
        name: "merge",
        description: "Merge PDF files into one",
        category: "PDF",
    },
    ToolInfo {
        name: "groups",
        description: "Merge a folder's PDFs grouped by name prefix",
        category: "PDF",
    },
    ToolInfo {
        name: "rename",
        description: "Bulk-rename a folder's PDFs by pattern",
        category: "PDF",
    },
    ToolInfo {
        name: "validate-emails",
        description: "Validate the email column of a spreadsheet",
        category: "Review",
    },
    ToolInfo {
        name: "horus",
        description: "Query affiliates in the Horus Health registry",
        category: "Review",
    },
    ToolInfo {
        name: "carnet",
        description: "Transform a vaccination sheet into the registry upload",
        category: "Records",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_are_unique() {
        let mut names: Vec<&str> = TOOLS.iter().map(|t| t.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TOOLS.len());
    }
}
