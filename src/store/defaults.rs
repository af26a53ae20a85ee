//! Built-in rule pack.
//!
//! Targets the CN phone region and the `en` datetime locale. Callers with
//! their own pack load it through [`crate::store::RuleStore::from_pack_file`];
//! this one keeps the crate usable out of the box and pins down the data
//! shapes the loader expects.
//!
//! Find-rule order is contractual: `[0]` probes short-number pairs, `[1]`
//! scans general numbers, `[2]` scans short numbers.

pub const DEFAULT_PACK: &str = r#"{
  "phone": {
    "region": "CN",
    "negative": [
      {"pattern": "[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{2,}"},
      {"pattern": "qq[.:]?\\s*\\d{5,11}", "insensitive": true},
      {"pattern": "\\d{4}[-/.]\\d{1,2}[-/.]\\d{1,2}"},
      {"pattern": "\\d{1,2}:\\d{2}(?::\\d{2})?"}
    ],
    "border": [
      {"pattern": "\\d{17,}", "kind": "contains"},
      {"pattern": "[¥$€£]\\s?\\d[\\d,.]*", "kind": "contains_or_intersects"}
    ],
    "codes": [
      {"valid": "prefix_suffix"},
      {"valid": "code"}
    ],
    "positive": [
      {"pattern": "\\d{3,6}\\s*[/|]\\s*\\d{3,6}", "handle": "slant"},
      {"pattern": "(?:17951|12593|17909|17911|11808)\\d{7,11}", "handle": "operator"},
      {"pattern": "\\d{3} \\d{4} \\d{4}", "handle": "blank"},
      {"pattern": "(?:tel|phone|fax|hotline)[.:]?\\s*\\d[\\d ()/-]{3,18}\\d", "handle": "start_with_mobile", "insensitive": true},
      {"pattern": "\\d[\\d ()/-]{3,18}\\d\\s*(?:ext|extension)[.:]?\\s*\\d{1,5}", "handle": "end_with_mobile", "insensitive": true}
    ],
    "find": [
      {"pattern": "\\d{3,6}\\s*[/|]\\s*\\d{3,6}"},
      {"pattern": "[+(\\[]?\\d[\\d()\\[\\] ./;=-]{3,24}\\d"},
      {"pattern": "\\b\\d{3,6}\\b"}
    ]
  },
  "datetime": {
    "locale": "en",
    "short_date_order": "mdy",
    "relative_separators": [","],
    "params": {
      "month": "January|February|March|April|May|June|July|August|September|October|November|December|Jan\\.|Feb\\.|Mar\\.|Apr\\.|Jun\\.|Jul\\.|Aug\\.|Sept\\.|Sep\\.|Oct\\.|Nov\\.|Dec\\.",
      "weekday": "Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday|Mon|Tues|Tue|Wed|Thurs|Thu|Fri|Sat|Sun"
    },
    "universe": [
      {"id": 10001, "pattern": "\\b\\d{4}-\\d{1,2}-\\d{1,2}[T ]\\d{1,2}:\\d{2}(?::\\d{2})?\\b"},
      {"id": 20016, "pattern": "\\b\\d{4}[-/.]\\d{1,2}[-/.]\\d{1,2}\\b"},
      {"id": 20014, "pattern": "\\b\\d{1,2}[-/.]\\d{1,2}[-/.]\\d{2,4}\\b"},
      {"id": 20015, "pattern": "\\b\\d{1,2}[-/.]\\d{1,2}[-/.]\\d{2,4}\\b"},
      {"id": 30001, "pattern": "\\b\\d{1,2}:\\d{2}(?::\\d{2})?\\s?(?:am|pm)?\\b", "insensitive": true},
      {"id": 30002, "pattern": "\\b\\d{1,2}\\s?(?:am|pm)\\b", "insensitive": true}
    ],
    "locale_rules": [
      {"id": 10002, "pattern": "(?:{{month}})\\s+\\d{1,2}(?:st|nd|rd|th)?\\s+at\\s+\\d{1,2}(?::\\d{2})?\\s*(?:am|pm)?\\b", "insensitive": true},
      {"id": 20001, "pattern": "(?:{{month}})\\s+\\d{1,2}(?:st|nd|rd|th)?(?:,\\s*\\d{4})?", "insensitive": true},
      {"id": 20002, "pattern": "\\b\\d{1,2}(?:st|nd|rd|th)?\\s+(?:{{month}})(?:\\s+\\d{4})?", "insensitive": true},
      {"id": 20005, "pattern": "\\b(?:tomorrow|yesterday|the day after tomorrow)\\b", "insensitive": true},
      {"id": 20009, "pattern": "(?:{{weekday}})", "insensitive": true},
      {"id": 20010, "pattern": "\\b(?:today|tonight)\\b", "insensitive": true},
      {"id": 20011, "pattern": "\\b(?:next|last|this)\\s+week\\b", "insensitive": true},
      {"id": 21026, "pattern": "(?:{{weekday}})(?:\\s*(?:,|and)\\s*(?:{{weekday}}))+", "insensitive": true},
      {"id": 50001, "pattern": "\\bfrom\\s+\\d{1,2}(?::\\d{2})?\\s*(?:am|pm)?\\s*(?:to|until|till)\\s*\\d{1,2}(?::\\d{2})?\\s*(?:am|pm)?\\b", "insensitive": true}
    ],
    "subs": {
      "21026": [
        {"id": 20009, "pattern": "(?:{{weekday}})", "insensitive": true}
      ]
    },
    "filter": [
      {"id": 90001, "pattern": "\\bversion\\s+\\d+(?:\\.\\d+){1,3}\\b", "insensitive": true},
      {"id": 90002, "pattern": "[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\\.[a-zA-Z]{2,}"}
    ],
    "past": [
      {"id": 100, "pattern": "\\b(?:last|past)\\s+", "insensitive": true},
      {"id": 250, "pattern": "\\s+(?:ago|earlier)\\b", "insensitive": true}
    ],
    "patterns": {
      "datetime": {"pattern": "\\s*(?:at|on|@)?\\s*", "insensitive": true},
      "period": {"pattern": "\\s*(?:-|–|~|to|until|till)\\s*", "insensitive": true},
      "brackets": {"pattern": "^\\s*[(\\[]([^)\\]]*)[)\\]]"}
    }
  }
}"#;
