use std::collections::HashMap;

use crate::models::{Definition, FileEntry};

/// Deep-merge `proposed` into `base`.
///
/// Files are unioned by path: unseen paths are appended in order, known paths
/// have every field present in the incoming entry overwrite the stored one.
/// Arrays (`natures`, `attributions`) are replaced, not unioned. Package-level
/// scalars are overwritten when the incoming definition carries them.
pub fn merge_definitions(base: &mut Definition, proposed: Definition) {
    if let Some(date) = proposed.described.and_then(|d| d.release_date) {
        base.described.get_or_insert_with(Default::default).release_date = Some(date);
    }

    if let Some(declared) = proposed.licensed.and_then(|l| l.declared) {
        base.licensed.get_or_insert_with(Default::default).declared = Some(declared);
    }

    merge_files(&mut base.files, proposed.files);
}

fn merge_files(base: &mut Vec<FileEntry>, proposed: Vec<FileEntry>) {
    let mut index: HashMap<String, usize> = base
        .iter()
        .enumerate()
        .map(|(i, f)| (f.path.clone(), i))
        .collect();

    for file in proposed {
        match index.get(&file.path) {
            Some(&i) => merge_file(&mut base[i], file),
            None => {
                index.insert(file.path.clone(), base.len());
                base.push(file);
            }
        }
    }
}

fn merge_file(base: &mut FileEntry, proposed: FileEntry) {
    if proposed.license.is_some() {
        base.license = proposed.license;
    }
    if proposed.natures.is_some() {
        base.natures = proposed.natures;
    }
    if proposed.attributions.is_some() {
        base.attributions = proposed.attributions;
    }
    if proposed.hashes.sha1.is_some() {
        base.hashes.sha1 = proposed.hashes.sha1;
    }
    if proposed.hashes.sha256.is_some() {
        base.hashes.sha256 = proposed.hashes.sha256;
    }
}
