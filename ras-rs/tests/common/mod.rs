#![allow(dead_code)]

use ras_rs::ras_cipher::encrypt;

/// Builds synthetic RAS archives in memory.
pub struct ArchiveBuilder {
    signature: [u8; 4],
    seed: i32,
    dirs: Vec<Vec<u8>>,
    files: Vec<PendingFile>,
    dir_block: Option<Vec<u8>>,
    file_block: Option<Vec<u8>>,
}

struct PendingFile {
    name: Vec<u8>,
    dir_index: u32,
    payload: Vec<u8>,
    uncompressed_size: u32,
}

impl ArchiveBuilder {
    pub fn new(seed: i32) -> Self {
        Self {
            signature: *b"RAS ",
            seed,
            dirs: Vec::new(),
            files: Vec::new(),
            dir_block: None,
            file_block: None,
        }
    }

    pub fn signature(mut self, signature: [u8; 4]) -> Self {
        self.signature = signature;
        self
    }

    /// Adds a directory record with the name exactly as stored.
    pub fn dir(mut self, name: &str) -> Self {
        self.dirs.push(name.as_bytes().to_vec());
        self
    }

    pub fn file(self, name: &str, dir_index: u32, payload: &[u8]) -> Self {
        let size = payload.len() as u32;
        self.file_with_size(name, dir_index, payload, size)
    }

    pub fn file_with_size(
        mut self,
        name: &str,
        dir_index: u32,
        payload: &[u8],
        uncompressed_size: u32,
    ) -> Self {
        self.files.push(PendingFile {
            name: name.as_bytes().to_vec(),
            dir_index,
            payload: payload.to_vec(),
            uncompressed_size,
        });
        self
    }

    /// Replaces the generated plaintext dir-info block. Record counts still
    /// come from the declared directories.
    pub fn raw_dir_block(mut self, block: Vec<u8>) -> Self {
        self.dir_block = Some(block);
        self
    }

    /// Replaces the generated plaintext file-info block.
    pub fn raw_file_block(mut self, block: Vec<u8>) -> Self {
        self.file_block = Some(block);
        self
    }

    fn encode_dirs(&self) -> Vec<u8> {
        let mut block = Vec::new();
        for name in &self.dirs {
            block.extend_from_slice(name);
            block.push(0);
            block.extend_from_slice(&[0xAB; 16]);
        }
        block
    }

    fn encode_files(&self) -> Vec<u8> {
        let mut block = Vec::new();
        for file in &self.files {
            block.extend_from_slice(&file.name);
            block.push(0);
            block.extend_from_slice(&file.uncompressed_size.to_le_bytes());
            block.extend_from_slice(&(file.payload.len() as u32).to_le_bytes());
            block.extend_from_slice(&7u32.to_le_bytes());
            block.extend_from_slice(&file.dir_index.to_le_bytes());
            block.extend_from_slice(&[0xCD; 24]);
        }
        block
    }

    pub fn build(&self) -> Vec<u8> {
        let mut file_block = self.file_block.clone().unwrap_or_else(|| self.encode_files());
        let mut dir_block = self.dir_block.clone().unwrap_or_else(|| self.encode_dirs());

        let mut base_info = Vec::with_capacity(36);
        for value in [
            self.files.len() as u32,
            self.dirs.len() as u32,
            file_block.len() as u32,
            dir_block.len() as u32,
            0,
            0,
            0,
            0,
            0,
        ] {
            base_info.extend_from_slice(&value.to_le_bytes());
        }

        encrypt(&mut base_info, self.seed);
        encrypt(&mut file_block, self.seed);
        encrypt(&mut dir_block, self.seed);

        let mut out = Vec::new();
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.seed.to_le_bytes());
        out.extend_from_slice(&base_info);
        out.extend_from_slice(&file_block);
        out.extend_from_slice(&dir_block);
        for file in &self.files {
            out.extend_from_slice(&file.payload);
        }
        out
    }
}

/// A minimal archive: one directory `lvl1\` holding a 12-byte `data.bin`.
pub fn lvl1_archive() -> Vec<u8> {
    ArchiveBuilder::new(0x5EED)
        .dir("\\lvl1\\")
        .file("data.bin", 0, b"hello, world")
        .build()
}
