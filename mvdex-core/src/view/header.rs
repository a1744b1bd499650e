use std::fmt;

/// Title block printed above every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub link: &'static str,
}

pub const DEX_HEADER: PageHeader = PageHeader {
    title: "⚖️ Minimum Viable DEX",
    subtitle: "The simples decentralized exchange example. Trade Ξ ETH for 🎈 balloons",
    link: "https://github.com/austintgriffith/scaffold-eth",
};

impl fmt::Display for PageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        write!(f, "{}", self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dex_header() {
        assert_eq!(
            DEX_HEADER.to_string(),
            "⚖️ Minimum Viable DEX\n\
             The simples decentralized exchange example. Trade Ξ ETH for 🎈 balloons\n\
             https://github.com/austintgriffith/scaffold-eth"
        );
    }
}
