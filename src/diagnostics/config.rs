/// Selects which lines of the listing the code generator traces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TracingConfig {
    All,
    Between(usize, usize),
    Before(usize),
    After(usize),
    Only(usize),
    Off,
}

impl TracingConfig {
    pub fn includes(&self, line: usize) -> bool {
        match *self {
            TracingConfig::All => true,
            TracingConfig::Between(start, end) => start <= line && line <= end,
            TracingConfig::Before(end) => line <= end,
            TracingConfig::After(start) => start <= line,
            TracingConfig::Only(only) => line == only,
            TracingConfig::Off => false,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig::Off
    }
}

/**
Parses a line range: `all`, a single line `N`, everything from a line on
`N:`, everything up to a line `:M`, or an inclusive range `N:M`.
 */
impl std::str::FromStr for TracingConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = |l: &str| {
            l.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid line number in trace range: {}", s))
        };

        match s.trim() {
            "all" => Ok(TracingConfig::All),
            "off" | "" => Ok(TracingConfig::Off),
            range => match range.split_once(':') {
                None => Ok(TracingConfig::Only(line(range)?)),
                Some(("", "")) => Ok(TracingConfig::All),
                Some((start, "")) => Ok(TracingConfig::After(line(start)?)),
                Some(("", end)) => Ok(TracingConfig::Before(line(end)?)),
                Some((start, end)) => {
                    let (start, end) = (line(start)?, line(end)?);
                    if start > end {
                        Err(format!("Trace range {} ends before it starts", s))
                    } else {
                        Ok(TracingConfig::Between(start, end))
                    }
                }
            },
        }
    }
}

pub trait Tracing {
    fn set_tracing(&mut self, config: TracingConfig);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        for (text, expected) in [
            ("all", TracingConfig::All),
            ("off", TracingConfig::Off),
            ("12", TracingConfig::Only(12)),
            ("3:", TracingConfig::After(3)),
            (":40", TracingConfig::Before(40)),
            ("3:40", TracingConfig::Between(3, 40)),
        ] {
            assert_eq!(text.parse::<TracingConfig>(), Ok(expected), "{}", text);
        }
    }

    #[test]
    fn parse_errors() {
        assert!("x".parse::<TracingConfig>().is_err());
        assert!("4:x".parse::<TracingConfig>().is_err());
        assert!("9:2".parse::<TracingConfig>().is_err());
    }

    #[test]
    fn includes() {
        assert!(TracingConfig::All.includes(100));
        assert!(!TracingConfig::Off.includes(0));
        assert!(TracingConfig::Between(2, 4).includes(4));
        assert!(!TracingConfig::Between(2, 4).includes(5));
        assert!(TracingConfig::Before(4).includes(0));
        assert!(!TracingConfig::After(4).includes(3));
        assert!(TracingConfig::Only(7).includes(7));
    }
}
