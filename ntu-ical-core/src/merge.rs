//! Stitching of class blocks that continue across row-span segments.
//!
//! A block ending at 1030 and a block starting at 1030 on the same day with
//! byte-identical `raw` text are one class. Two unrelated classes with
//! identical text in back-to-back slots are merged as well; the table gives
//! no way to tell them apart.

use std::collections::HashMap;

use crate::block::ClassBlock;

/// (day, time, raw)
type SlotKey<'a> = (&'a str, &'a str, &'a str);

/// Collapse continuation chains into their first block.
///
/// The first block of each chain keeps its position and takes the `end` of
/// the last block in the chain, however many segments long. Blocks without a
/// predecessor or successor pass through unchanged.
pub fn merge_blocks(mut blocks: Vec<ClassBlock>) -> Vec<ClassBlock> {
    let mut absorbed = vec![false; blocks.len()];
    let mut chains: Vec<(usize, usize)> = Vec::new();

    {
        let by_begin: HashMap<SlotKey, usize> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| ((b.day.as_str(), b.begin.as_str(), b.raw.as_str()), i))
            .collect();
        let by_end: HashMap<SlotKey, usize> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| ((b.day.as_str(), b.end.as_str(), b.raw.as_str()), i))
            .collect();

        for (first, block) in blocks.iter().enumerate() {
            let own_key = (block.day.as_str(), block.begin.as_str(), block.raw.as_str());
            if by_end.get(&own_key).is_some_and(|&pred| pred != first) {
                continue;
            }

            let mut last = first;
            loop {
                let tail = &blocks[last];
                let next_key = (tail.day.as_str(), tail.end.as_str(), tail.raw.as_str());
                match by_begin.get(&next_key) {
                    Some(&next) if next != first && !absorbed[next] => {
                        absorbed[next] = true;
                        last = next;
                    }
                    _ => break,
                }
            }

            if last != first {
                chains.push((first, last));
            }
        }
    }

    for (first, last) in chains {
        blocks[first].end = blocks[last].end.clone();
    }

    blocks
        .into_iter()
        .zip(absorbed)
        .filter(|(_, absorbed)| !absorbed)
        .map(|(block, _)| block)
        .collect()
}
