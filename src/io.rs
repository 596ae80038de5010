// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module reads nice tree decomposition descriptions from their text
//! form. The format is line oriented:
//!
//! ```plain
//! c free form comments
//! s ntd 5
//! b 0 f - {}
//! b 1 f 0 {1}
//! b 2 i 1 {0,1} [(0,1)]
//! b 3 i 2 {0}
//! b 4 l 3 {}
//! ```
//!
//! The `s` line announces the number of bags; each `b` line declares one bag
//! with its identifier, its type tag (`l`eaf, `i`ntroduce, `f`orget, `j`oin),
//! its parent identifier (`-` for the root), the vertices it holds and,
//! optionally, the edges it introduces.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;

use regex::Regex;

use crate::{BagSpec, BagType, Decomposition, DecompositionError, Vertex};

/// This enumeration simply groups the kinds of errors that might occur when
/// reading a decomposition from file. There can be io errors (file
/// unavailable ?), parse int errors (the reader expected an integer number
/// but got ... something else), format errors (a line matching no known
/// declaration), or structural errors surfaced by the validation of the
/// parsed bags.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The reader expected to read an integer but got some garbage
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// The file was not properly formatted.
    #[error("ill formed instance")]
    Format,
    /// The bags were readable but do not form a nice tree decomposition.
    #[error(transparent)]
    Malformed(#[from] DecompositionError),
}

/// Reads the bag descriptions from the given reader. The returned
/// descriptions are syntactically sound but not yet validated against the
/// structural contract: that is `Decomposition::new`'s job.
pub fn parse_decomposition<R: BufRead>(reader: R) -> Result<Vec<BagSpec>, Error> {
    let comment = Regex::new(r"^c(\s.*)?$").unwrap();
    let header = Regex::new(r"^s\s+ntd\s+(?P<bags>\d+)$").unwrap();
    let bag_decl = Regex::new(
        r"^b\s+(?P<id>\d+)\s+(?P<kind>[lifj])\s+(?P<parent>\d+|-)\s+\{(?P<vertices>[^}]*)\}\s*(?P<edges>.*)$",
    )
    .unwrap();
    let edge_decl = Regex::new(r"\((?P<src>\d+)\s*,\s*(?P<dst>\d+)\)").unwrap();

    let mut announced = None;
    let mut specs = vec![];
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || comment.is_match(line) {
            continue;
        }

        if let Some(caps) = header.captures(line) {
            if announced.is_some() {
                return Err(Error::Format);
            }
            announced = Some(caps["bags"].parse::<usize>()?);
            continue;
        }

        if let Some(caps) = bag_decl.captures(line) {
            if announced.is_none() {
                return Err(Error::Format);
            }
            let id = caps["id"].parse::<usize>()?;
            let bag_type = match &caps["kind"] {
                "l" => BagType::Leaf,
                "i" => BagType::Introduce,
                "f" => BagType::Forget,
                _ => BagType::Join,
            };
            let parent = match &caps["parent"] {
                "-" => None,
                parent => Some(parent.parse::<usize>()?),
            };
            let mut vertices = vec![];
            for token in caps["vertices"].split(',') {
                let token = token.trim();
                if !token.is_empty() {
                    vertices.push(Vertex(token.parse::<usize>()?));
                }
            }
            let mut edges = vec![];
            for edge in edge_decl.captures_iter(&caps["edges"]) {
                let src = edge["src"].parse::<usize>()?;
                let dst = edge["dst"].parse::<usize>()?;
                edges.push((Vertex(src), Vertex(dst)));
            }
            specs.push(BagSpec { id, bag_type, parent, vertices, edges });
            continue;
        }

        return Err(Error::Format);
    }

    if announced != Some(specs.len()) {
        return Err(Error::Format);
    }
    Ok(specs)
}

/// Reads and validates a decomposition from file: the composition of
/// `parse_decomposition` and `Decomposition::new`.
pub fn read_decomposition<P: AsRef<Path>>(fname: P) -> Result<Decomposition, Error> {
    let f = File::open(fname)?;
    let f = BufReader::new(f);
    let specs = parse_decomposition(f)?;
    Ok(Decomposition::new(specs)?)
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_io {
    use std::io::Cursor;

    use crate::io::{parse_decomposition, Error};
    use crate::{BagType, Vertex};

    const SINGLE_EDGE: &str = "\
c the path on two vertices
s ntd 5
b 0 f - {}
b 1 f 0 {1}
b 2 i 1 {0,1} [(0,1)]
b 3 i 2 {0}
b 4 l 3 {}
";

    #[test]
    fn a_sound_instance_parses() {
        let specs = parse_decomposition(Cursor::new(SINGLE_EDGE)).unwrap();
        assert_eq!(5, specs.len());

        assert_eq!(0, specs[0].id);
        assert_eq!(BagType::Forget, specs[0].bag_type);
        assert_eq!(None, specs[0].parent);
        assert!(specs[0].vertices.is_empty());

        assert_eq!(BagType::Introduce, specs[2].bag_type);
        assert_eq!(Some(1), specs[2].parent);
        assert_eq!(vec![Vertex(0), Vertex(1)], specs[2].vertices);
        assert_eq!(vec![(Vertex(0), Vertex(1))], specs[2].edges);

        assert_eq!(BagType::Leaf, specs[4].bag_type);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let noisy = format!("c noise\n\n{SINGLE_EDGE}\nc trailing noise\n");
        assert_eq!(5, parse_decomposition(Cursor::new(noisy)).unwrap().len());
    }

    #[test]
    fn a_bag_before_the_header_is_rejected() {
        let input = "b 0 f - {}\ns ntd 1\n";
        assert!(matches!(
            parse_decomposition(Cursor::new(input)),
            Err(Error::Format)
        ));
    }

    #[test]
    fn an_unknown_declaration_is_rejected() {
        let input = format!("{SINGLE_EDGE}x 1 2\n");
        assert!(matches!(
            parse_decomposition(Cursor::new(input)),
            Err(Error::Format)
        ));
    }

    #[test]
    fn a_bag_count_mismatch_is_rejected() {
        let input = "s ntd 3\nb 0 f - {}\n";
        assert!(matches!(
            parse_decomposition(Cursor::new(input)),
            Err(Error::Format)
        ));
    }
}
